use assert_matches::assert_matches;
use keenpbr_web::config::{self, Config, IpSetConfig, ListConfig, ListSource, SourceKind};
use keenpbr_web::{ConfigError, ConfigStore, ErrorKind};
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

// 辅助函数：创建临时配置文件
fn create_temp_config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const SAMPLE_CONFIG: &str = r#"
[general]
lists_output_dir = "/opt/etc/keen-pbr/lists.d"
use_keenetic_dns = true
fallback_dns = "8.8.8.8"

[[ipset]]
ipset_name = "vpn"
lists = ["local", "remote", "file"]
ip_version = 4
flush_before_applying = true

[ipset.routing]
interfaces = ["nwg0", "nwg1"]
kill_switch = true
fwmark = 1001
table = 1001
priority = 1001
override_dns = "1.1.1.1"

[[ipset]]
ipset_name = "vpn6"
lists = ["remote"]
ip_version = 6

[[list]]
list_name = "local"
hosts = ["example.com", "192.168.0.0/16"]

[[list]]
list_name = "remote"
url = "https://example.com/list.txt"

[[list]]
list_name = "file"
file = "/opt/etc/keen-pbr/local.lst"
"#;

#[test]
fn test_full_config_loading() {
    let file = create_temp_config_file(SAMPLE_CONFIG);
    let result = Config::from_file(file.path());

    assert!(
        result.is_ok(),
        "Failed to load valid config: {:?}",
        result.err()
    );
    let config = result.unwrap();

    // 全局设置
    assert_eq!(config.general.lists_output_dir, "/opt/etc/keen-pbr/lists.d");
    assert!(config.general.use_keenetic_dns);
    assert!(!config.general.use_keenetic_api);
    assert_eq!(config.general.fallback_dns, "8.8.8.8");

    // IPSet
    assert_eq!(config.ipsets.len(), 2);
    let vpn = config.find_ipset("vpn").unwrap();
    assert_eq!(vpn.lists, vec!["local", "remote", "file"]);
    assert!(vpn.flush_before_applying);
    assert_eq!(vpn.routing.interfaces, vec!["nwg0", "nwg1"]);
    assert!(vpn.routing.kill_switch);
    assert_eq!(vpn.routing.fwmark, 1001);
    assert_eq!(vpn.routing.override_dns.as_deref(), Some("1.1.1.1"));
    assert_eq!(config.find_ipset("vpn6").unwrap().ip_version, 6);

    // 列表来源
    assert_eq!(config.lists.len(), 3);
    assert_eq!(config.find_list("local").unwrap().kind(), SourceKind::Inline);
    assert_eq!(config.find_list("remote").unwrap().kind(), SourceKind::Url);
    assert_eq!(
        config.find_list("file").unwrap().source,
        ListSource::File {
            path: "/opt/etc/keen-pbr/local.lst".to_string()
        }
    );
}

#[test]
fn test_default_values() {
    let config_content = r#"
[[ipset]]
ipset_name = "vpn"

[[list]]
list_name = "empty"
"#;

    let config = config::decode(config_content).unwrap();

    // 未设置的字段取默认值
    assert_eq!(config.general.lists_output_dir, "");
    assert!(!config.general.use_keenetic_api);
    let ipset = &config.ipsets[0];
    assert_eq!(ipset.ip_version, 4);
    assert!(ipset.lists.is_empty());
    assert!(!ipset.flush_before_applying);
    assert!(ipset.routing.interfaces.is_empty());
    assert_eq!(ipset.routing.override_dns, None);

    // 没有任何来源字段的列表视为空的内联列表
    assert_eq!(
        config.lists[0].source,
        ListSource::Inline { hosts: Vec::new() }
    );
}

#[test]
fn test_empty_document() {
    let config = config::decode("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_round_trip_preserves_semantics() {
    let original = config::decode(SAMPLE_CONFIG).unwrap();

    let encoded = config::encode(&original).unwrap();
    let decoded = config::decode(&encoded).unwrap();

    assert_eq!(original, decoded);
    // 磁盘形式使用 [[ipset]] / [[list]]
    assert!(encoded.contains("[[ipset]]"));
    assert!(encoded.contains("[[list]]"));
    assert!(encoded.contains("list_name = \"remote\""));
}

#[test]
fn test_empty_override_dns_is_omitted() {
    let config_content = r#"
[[ipset]]
ipset_name = "vpn"

[ipset.routing]
priority = 1001
override_dns = ""
"#;

    let config = config::decode(config_content).unwrap();
    assert_eq!(config.ipsets[0].routing.override_dns, None);

    let encoded = config::encode(&config).unwrap();
    assert!(!encoded.contains("override_dns"), "{}", encoded);

    // JSON 形式提交的空值同样不写入
    let json = r#"{"ipsets":[{"ipset_name":"vpn","routing":{"override_dns":""}}]}"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.ipsets[0].routing.override_dns, None);
    assert!(!config::encode(&config).unwrap().contains("override_dns"));

    // 代码中直接构造的空值
    let mut config = Config::default();
    let mut ipset = IpSetConfig::new("vpn");
    ipset.routing.override_dns = Some(String::new());
    config.ipsets.push(ipset);
    assert!(!config::encode(&config).unwrap().contains("override_dns"));
}

#[test]
fn test_syntax_error_is_parse_error() {
    let result = config::decode("[general\nfallback_dns = ");
    assert_matches!(result, Err(ConfigError::ParseError(_)));

    // 类型错误同样归为解析错误
    let result = config::decode("[[ipset]]\nipset_name = 42\n");
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_ambiguous_list_source_rejected() {
    let config_content = r#"
[[list]]
list_name = "both"
url = "https://example.com/list.txt"
file = "/tmp/list.txt"
"#;

    let result = config::decode(config_content);
    assert_matches!(result, Err(ConfigError::ValidationError(msg)) if msg.contains("both") && msg.contains("url, file"));
}

#[test]
fn test_empty_source_fields_are_ignored() {
    let config_content = r#"
[[list]]
list_name = "remote"
url = "https://example.com/list.txt"
file = ""
hosts = []
"#;

    let config = config::decode(config_content).unwrap();
    assert_eq!(config.lists[0].kind(), SourceKind::Url);
}

#[test]
fn test_duplicate_names_rejected() {
    // IPSet 名称重复
    let config_content = r#"
[[ipset]]
ipset_name = "vpn"

[[ipset]]
ipset_name = "vpn"
"#;
    let result = config::decode(config_content);
    assert_matches!(result, Err(ConfigError::ValidationError(msg)) if msg.contains("IPSet names must be unique"));

    // 列表名称重复
    let config_content = r#"
[[list]]
list_name = "a"
hosts = ["a.com"]

[[list]]
list_name = "a"
url = "https://example.com"
"#;
    let result = config::decode(config_content);
    assert_matches!(result, Err(ConfigError::ValidationError(msg)) if msg.contains("List names must be unique"));
}

#[test]
fn test_invalid_ip_version() {
    let config_content = r#"
[[ipset]]
ipset_name = "vpn"
ip_version = 5
"#;
    let result = config::decode(config_content);
    assert_matches!(result, Err(ConfigError::ValidationError(msg)) if msg.contains("ip_version must be 4 or 6"));
}

#[test]
fn test_empty_names_rejected() {
    let mut config = Config::default();
    config.ipsets.push(IpSetConfig::new(""));
    assert_matches!(config.validate(), Err(ConfigError::ValidationError(msg)) if msg.contains("ipset_name must not be empty"));

    let mut config = Config::default();
    config
        .lists
        .push(ListConfig::new("", ListSource::Inline { hosts: vec![] }));
    assert_matches!(config.validate(), Err(ConfigError::ValidationError(msg)) if msg.contains("list_name must not be empty"));
}

#[test]
fn test_dangling_references_are_loadable() {
    let config_content = r#"
[[ipset]]
ipset_name = "vpn"
lists = ["missing", "local"]

[[list]]
list_name = "local"
hosts = ["example.com"]
"#;

    let config = config::decode(config_content).unwrap();
    assert_eq!(
        config.dangling_references(),
        vec![("vpn".to_string(), "missing".to_string())]
    );
}

#[test]
fn test_list_references_in_document_order() {
    let config = config::decode(SAMPLE_CONFIG).unwrap();

    assert_eq!(config.list_references("remote"), vec!["vpn", "vpn6"]);
    assert_eq!(config.list_references("local"), vec!["vpn"]);
    assert!(config.list_references("unknown").is_empty());
}

#[test]
fn test_json_form_uses_plural_keys() {
    let config = config::decode(SAMPLE_CONFIG).unwrap();
    let json = serde_json::to_value(&config).unwrap();

    assert!(json.get("ipsets").is_some());
    assert!(json.get("lists").is_some());
    assert_eq!(json["lists"][1]["list_name"], "remote");
    assert_eq!(json["lists"][1]["url"], "https://example.com/list.txt");
    assert!(json["lists"][1].get("file").is_none());

    let back: Config = serde_json::from_value(json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keen-pbr.conf");
    fs::write(&path, SAMPLE_CONFIG).unwrap();

    let store = ConfigStore::new(&path);
    let mut config = store.load().unwrap();
    config.general.fallback_dns = "9.9.9.9".to_string();
    store.save(&config).unwrap();

    let reloaded = store.load().unwrap();
    assert_eq!(reloaded, config);
    assert_eq!(reloaded.general.fallback_dns, "9.9.9.9");

    // 不留下临时文件
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_store_raw_rejects_invalid_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keen-pbr.conf");
    fs::write(&path, SAMPLE_CONFIG).unwrap();
    let store = ConfigStore::new(&path);

    // 语法错误
    let result = store.save_raw("[[ipset]\nbroken");
    assert_matches!(result, Err(ConfigError::ParseError(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE_CONFIG);

    // 语义错误
    let result = store.save_raw("[[list]]\nlist_name = \"x\"\nurl = \"a\"\nhosts = [\"b\"]\n");
    assert_matches!(result, Err(ConfigError::ValidationError(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE_CONFIG);
}

#[test]
fn test_store_raw_writes_text_verbatim() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keen-pbr.conf");
    fs::write(&path, "").unwrap();
    let store = ConfigStore::new(&path);

    let content = "# managed by hand\n[[ipset]]\nipset_name = \"vpn\"\n";
    let config = store.save_raw(content).unwrap();

    assert_eq!(config.ipsets.len(), 1);
    assert_eq!(store.load_raw().unwrap(), content);
}

#[test]
fn test_store_missing_file() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::new(dir.path().join("absent.conf"));

    let result = store.load();
    assert_matches!(result, Err(ConfigError::LoadError(_)));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Io);
}

#[test]
fn test_store_update_skips_write_on_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keen-pbr.conf");
    fs::write(&path, SAMPLE_CONFIG).unwrap();
    let store = ConfigStore::new(&path);

    let result: Result<(), _> = store.update(|config| {
        config.lists.clear();
        Err(keenpbr_web::AppError::Internal("abort".to_string()))
    });

    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE_CONFIG);
}

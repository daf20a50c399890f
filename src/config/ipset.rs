use crate::r#const::config_defaults;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

// 默认IP版本
fn default_ip_version() -> u8 {
    config_defaults::DEFAULT_IP_VERSION
}

// 自定义验证函数 - 验证IP版本
fn validate_ip_version(ipset: &IpSetConfig) -> Result<(), ValidationError> {
    if config_defaults::IP_VERSIONS.contains(&ipset.ip_version) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_ip_version"))
    }
}

// 空字符串视为未设置
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

// 路由参数
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RoutingConfig {
    // 出口接口（按优先级）
    pub interfaces: Vec<String>,
    // 所有接口不可用时丢弃流量
    pub kill_switch: bool,
    // 防火墙标记
    pub fwmark: u32,
    // 路由表编号
    pub table: u32,
    // 策略规则优先级
    pub priority: u32,
    // DNS 覆盖（可选）
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "is_blank"
    )]
    pub override_dns: Option<String>,
}

// IPSet 配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Validate)]
#[validate(schema(function = "validate_ip_version", message = "ip_version must be 4 or 6"))]
pub struct IpSetConfig {
    // IPSet 名称
    #[validate(length(min = 1, message = "ipset_name must not be empty"))]
    pub ipset_name: String,
    // 引用的列表名称
    #[serde(default)]
    pub lists: Vec<String>,
    // IP 版本（4 或 6）
    #[serde(default = "default_ip_version")]
    pub ip_version: u8,
    // 应用前是否清空
    #[serde(default)]
    pub flush_before_applying: bool,
    // 路由参数
    #[serde(default)]
    pub routing: RoutingConfig,
}

impl IpSetConfig {
    // 创建只带名称的 IPSet，其余字段取默认值
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            ipset_name: name.into(),
            lists: Vec::new(),
            ip_version: default_ip_version(),
            flush_before_applying: false,
            routing: RoutingConfig::default(),
        }
    }

    // 是否引用了指定列表
    pub fn references(&self, list_name: &str) -> bool {
        self.lists.iter().any(|l| l == list_name)
    }
}

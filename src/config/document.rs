// TOML 磁盘格式与 Config 之间的转换

use super::{Config, ConfigResult, GeneralConfig, IpSetConfig, ListConfig, ListRecord};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// keen-pbr 配置文件的磁盘形式：`[general]`、`[[ipset]]`、`[[list]]`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct ConfigDocument {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default, rename = "ipset", skip_serializing_if = "Vec::is_empty")]
    pub ipsets: Vec<IpSetConfig>,
    #[serde(default, rename = "list", skip_serializing_if = "Vec::is_empty")]
    pub lists: Vec<ListRecord>,
}

impl TryFrom<ConfigDocument> for Config {
    type Error = ConfigError;

    fn try_from(document: ConfigDocument) -> Result<Self, Self::Error> {
        let lists = document
            .lists
            .into_iter()
            .map(ListConfig::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Config {
            general: document.general,
            ipsets: document.ipsets,
            lists,
        })
    }
}

impl From<&Config> for ConfigDocument {
    fn from(config: &Config) -> Self {
        ConfigDocument {
            general: config.general.clone(),
            ipsets: config.ipsets.clone(),
            lists: config.lists.iter().cloned().map(ListRecord::from).collect(),
        }
    }
}

/// 解析并校验配置文本
///
/// 语法或类型错误返回 `ParseError`；来源冲突、名称重复等返回 `ValidationError`。
pub fn decode(content: &str) -> ConfigResult<Config> {
    let document: ConfigDocument = toml::from_str(content)?;
    let config = Config::try_from(document)?;
    config.validate()?;
    Ok(config)
}

/// 序列化为规范的 TOML 文本
pub fn encode(config: &Config) -> ConfigResult<String> {
    Ok(toml::to_string(&ConfigDocument::from(config))?)
}

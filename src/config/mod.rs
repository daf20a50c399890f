use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;
use validator::{Validate, ValidationError, ValidationErrors};

pub mod document;
pub mod general;
pub mod ipset;
pub mod list;

pub use document::*;
pub use general::*;
pub use ipset::*;
pub use list::*;

// 配置结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

// 自定义验证函数 - 验证IPSet名称唯一性
pub fn validate_unique_ipset_names(config: &Config) -> Result<(), ValidationError> {
    let mut names = HashSet::new();
    for ipset in &config.ipsets {
        if !names.insert(ipset.ipset_name.as_str()) {
            return Err(ValidationError::new("duplicate_ipset_name"));
        }
    }
    Ok(())
}

// 自定义验证函数 - 验证列表名称唯一性
pub fn validate_unique_list_names(config: &Config) -> Result<(), ValidationError> {
    let mut names = HashSet::new();
    for list in &config.lists {
        if !names.insert(list.name.as_str()) {
            return Err(ValidationError::new("duplicate_list_name"));
        }
    }
    Ok(())
}

/// 完整配置
///
/// 持久化的最小单位：每次修改都加载整个文档、在内存中修改、再整体写回。
/// JSON 形式使用 `ipsets` / `lists`，TOML 形式见 [`ConfigDocument`]。
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default, Validate)]
#[validate(schema(
    function = "validate_unique_ipset_names",
    message = "IPSet names must be unique"
))]
#[validate(schema(
    function = "validate_unique_list_names",
    message = "List names must be unique"
))]
pub struct Config {
    // 全局设置
    #[serde(default)]
    pub general: GeneralConfig,
    // IPSet 配置
    #[serde(default)]
    #[validate(nested)]
    pub ipsets: Vec<IpSetConfig>,
    // 列表配置
    #[serde(default)]
    #[validate(nested)]
    pub lists: Vec<ListConfig>,
}

impl Config {
    // 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        debug!("Loading configuration file: {:?}", path.as_ref());
        let content = std::fs::read_to_string(path).map_err(ConfigError::LoadError)?;
        decode(&content)
    }

    // 验证配置有效性
    pub fn validate(&self) -> ConfigResult<()> {
        // 使用 validator 库进行验证
        if let Err(errors) = Validate::validate(self) {
            return Err(ConfigError::ValidationError(format_validation_errors(
                &errors,
            )));
        }
        Ok(())
    }

    pub fn find_list(&self, name: &str) -> Option<&ListConfig> {
        self.lists.iter().find(|l| l.name == name)
    }

    pub fn find_list_mut(&mut self, name: &str) -> Option<&mut ListConfig> {
        self.lists.iter_mut().find(|l| l.name == name)
    }

    pub fn find_ipset(&self, name: &str) -> Option<&IpSetConfig> {
        self.ipsets.iter().find(|s| s.ipset_name == name)
    }

    pub fn find_ipset_mut(&mut self, name: &str) -> Option<&mut IpSetConfig> {
        self.ipsets.iter_mut().find(|s| s.ipset_name == name)
    }

    /// 引用指定列表的 IPSet 名称，按 IPSet 在文档中的顺序
    ///
    /// 反向索引每次现算，不做缓存。
    pub fn list_references(&self, list_name: &str) -> Vec<String> {
        self.ipsets
            .iter()
            .filter(|s| s.references(list_name))
            .map(|s| s.ipset_name.clone())
            .collect()
    }

    /// IPSet 中指向不存在列表的引用，返回 (ipset, list) 对
    pub fn dangling_references(&self) -> Vec<(String, String)> {
        let names: HashSet<&str> = self.lists.iter().map(|l| l.name.as_str()).collect();
        self.ipsets
            .iter()
            .flat_map(|s| {
                s.lists
                    .iter()
                    .filter(|l| !names.contains(l.as_str()))
                    .map(move |l| (s.ipset_name.clone(), l.clone()))
            })
            .collect()
    }
}

// 将 ValidationErrors 转换为友好的错误信息
fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, error_kind) in errors.errors() {
        match error_kind {
            validator::ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    // 结构级校验挂在 __all__ 下
                    if *field == "__all__" {
                        messages.push(message);
                    } else {
                        messages.push(format!("Field '{}': {}", field, message));
                    }
                }
            }
            validator::ValidationErrorsKind::Struct(struct_errors) => {
                messages.push(format!(
                    "'{}': {}",
                    field,
                    format_validation_errors(struct_errors)
                ));
            }
            validator::ValidationErrorsKind::List(list_errors) => {
                for (index, err) in list_errors {
                    messages.push(format!(
                        "'{}' at index {}: {}",
                        field,
                        index,
                        format_validation_errors(err)
                    ));
                }
            }
        }
    }

    if messages.is_empty() {
        "Unknown validation error".to_string()
    } else {
        messages.join("\n")
    }
}

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use validator::Validate;

// 列表来源类型
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    // 直接写在配置中的主机
    Inline,
    // 本地文件
    File,
    // 远程地址
    Url,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Inline => "inline",
            SourceKind::File => "file",
            SourceKind::Url => "url",
        }
    }
}

/// 列表内容的来源，加载时一次性确定
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListSource {
    /// 主机直接保存在配置文档中
    Inline { hosts: Vec<String> },
    /// 每行一个条目的本地文本文件
    File { path: String },
    /// 由外部下载器获取的远程列表
    Url { url: String },
}

impl ListSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            ListSource::Inline { .. } => SourceKind::Inline,
            ListSource::File { .. } => SourceKind::File,
            ListSource::Url { .. } => SourceKind::Url,
        }
    }
}

/// 配置文件中 `[[list]]` 记录的原始形式
///
/// 来源由哪个可选字段非空决定，转换为 [`ListConfig`] 时校验唯一性。
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct ListRecord {
    pub list_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,
}

// 列表配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Validate)]
#[serde(try_from = "ListRecord", into = "ListRecord")]
pub struct ListConfig {
    // 列表名称
    #[validate(length(min = 1, message = "list_name must not be empty"))]
    pub name: String,
    // 列表来源
    pub source: ListSource,
}

impl ListConfig {
    pub fn new(name: impl Into<String>, source: ListSource) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.source.kind()
    }
}

// 非空字符串字段
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl TryFrom<ListRecord> for ListConfig {
    type Error = ConfigError;

    fn try_from(record: ListRecord) -> Result<Self, Self::Error> {
        let url = non_empty(record.url);
        let file = non_empty(record.file);
        let hosts = record.hosts.filter(|h| !h.is_empty());

        let mut populated = Vec::new();
        if url.is_some() {
            populated.push("url");
        }
        if file.is_some() {
            populated.push("file");
        }
        if hosts.is_some() {
            populated.push("hosts");
        }
        if populated.len() > 1 {
            return Err(ConfigError::ValidationError(format!(
                "list '{}' defines more than one source: {}",
                record.list_name,
                populated.join(", ")
            )));
        }

        let source = match (url, file, hosts) {
            (Some(url), _, _) => ListSource::Url { url },
            (_, Some(path), _) => ListSource::File { path },
            (_, _, hosts) => ListSource::Inline {
                hosts: hosts.unwrap_or_default(),
            },
        };

        Ok(ListConfig {
            name: record.list_name,
            source,
        })
    }
}

impl From<ListConfig> for ListRecord {
    fn from(list: ListConfig) -> Self {
        let mut record = ListRecord {
            list_name: list.name,
            ..Default::default()
        };
        match list.source {
            ListSource::Inline { hosts } => {
                // 空列表不写 hosts 字段
                if !hosts.is_empty() {
                    record.hosts = Some(hosts);
                }
            }
            ListSource::File { path } => record.file = Some(path),
            ListSource::Url { url } => record.url = Some(url),
        }
        record
    }
}

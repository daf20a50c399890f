use crate::config::{ListConfig, ListSource, SourceKind};
use crate::r#const::list_file;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 列表的解析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedList {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// 具体条目；远程列表永远为空，文件读取失败时也为空
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<String>>,
}

/// 列表解析器
///
/// 按来源类型取得列表内容：内联列表直接返回配置中的主机，
/// 文件列表读取并解析本地文件，远程列表只给出地址，不做下载。
#[derive(Debug, Clone)]
pub struct ListResolver {
    /// 相对路径的基准目录
    base_dir: PathBuf,
}

impl ListResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// 列表文件的实际路径
    pub fn file_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// 只描述来源，不读取内容
    pub fn describe(&self, list: &ListConfig) -> ResolvedList {
        let mut resolved = ResolvedList {
            name: list.name.clone(),
            kind: list.kind(),
            url: None,
            file: None,
            entries: None,
        };
        match &list.source {
            ListSource::Url { url } => resolved.url = Some(url.clone()),
            ListSource::File { path } => resolved.file = Some(path.clone()),
            ListSource::Inline { .. } => {}
        }
        resolved
    }

    /// 解析列表内容
    pub fn resolve(&self, list: &ListConfig) -> ResolvedList {
        let mut resolved = self.describe(list);
        resolved.entries = match &list.source {
            ListSource::Inline { hosts } => Some(hosts.clone()),
            ListSource::File { path } => self.read_entries(&list.name, path),
            ListSource::Url { .. } => None,
        };
        resolved
    }

    // 文件读取失败时降级为不返回条目
    fn read_entries(&self, name: &str, path: &str) -> Option<Vec<String>> {
        let file_path = self.file_path(path);
        match fs::read_to_string(&file_path) {
            Ok(content) => {
                let entries = parse_list_entries(&content);
                debug!("List '{}' loaded {} entries from file", name, entries.len());
                Some(entries)
            }
            Err(e) => {
                warn!(
                    "Failed to read file for list '{}' ({:?}): {}",
                    name, file_path, e
                );
                None
            }
        }
    }
}

/// 解析列表文件内容
///
/// 去除首尾空白，跳过空行和 `#` 开头的注释，保留其余行的顺序。
pub fn parse_list_entries(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(list_file::COMMENT_PREFIX))
        .map(str::to_string)
        .collect()
}

/// 列表文件的写入格式：每行一个条目，以换行结尾
pub fn format_list_entries(entries: &[String]) -> String {
    let mut content = entries.join("\n");
    content.push('\n');
    content
}

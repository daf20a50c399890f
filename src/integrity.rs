// 列表与 IPSet 之间的引用完整性
//
// IPSet 通过名称引用列表（多对多），引用只保存在 IPSet 一侧。
// 创建、删除都在内存中同时修改两侧，再由存储层一次写入。

use crate::config::{Config, ListConfig, ListSource};
use crate::error::AppError;
use crate::metrics::METRICS;
use crate::r#const::write_mode_labels;
use crate::resolver::{format_list_entries, ListResolver, ResolvedList};
use crate::store::{write_atomic, ConfigStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// 新建列表请求
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct NewList {
    /// 列表名称
    #[serde(default)]
    pub name: String,
    /// 远程地址
    #[serde(default)]
    pub url: String,
    /// 引用该列表的 IPSet
    #[serde(default)]
    pub ipset: String,
}

/// 列表视图：来源描述、条目与反向引用
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ListView {
    #[serde(flatten)]
    pub list: ResolvedList,
    /// 引用该列表的 IPSet，按文档顺序
    pub ipsets: Vec<String>,
}

/// 把列表加入配置并挂到目标 IPSet 上
pub fn attach_list(config: &mut Config, list: ListConfig, target: &str) -> Result<(), AppError> {
    if config.find_list(&list.name).is_some() {
        return Err(AppError::ListAlreadyExists(list.name));
    }

    let ipset = config.find_ipset_mut(target).ok_or_else(|| {
        AppError::InvalidRequest(format!("ipset '{}' does not exist", target))
    })?;
    // 残留的同名引用不重复追加
    if !ipset.references(&list.name) {
        ipset.lists.push(list.name.clone());
    }

    config.lists.push(list);
    Ok(())
}

/// 删除列表并清理所有 IPSet 中对它的引用
pub fn detach_list(config: &mut Config, name: &str) -> Result<ListConfig, AppError> {
    let index = config
        .lists
        .iter()
        .position(|l| l.name == name)
        .ok_or_else(|| AppError::ListNotFound(name.to_string()))?;
    let removed = config.lists.remove(index);

    for ipset in config.ipsets.iter_mut() {
        ipset.lists.retain(|l| l != name);
    }

    Ok(removed)
}

// 去除首尾空白，空值报错
fn required(value: &str, field: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidRequest(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// 列表管理器
pub struct ListManager {
    store: Arc<ConfigStore>,
    resolver: ListResolver,
}

impl ListManager {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        let resolver = ListResolver::new(store.base_dir());
        Self { store, resolver }
    }

    /// 所有列表的来源描述与引用，不读取条目
    pub fn list_all(&self) -> Result<Vec<ListView>, AppError> {
        let config = self.store.load()?;
        Ok(config
            .lists
            .iter()
            .map(|list| ListView {
                list: self.resolver.describe(list),
                ipsets: config.list_references(&list.name),
            })
            .collect())
    }

    /// 单个列表，包含解析后的条目
    pub fn get_list(&self, name: &str) -> Result<ListView, AppError> {
        let config = self.store.load()?;
        let list = config
            .find_list(name)
            .ok_or_else(|| AppError::ListNotFound(name.to_string()))?;

        Ok(ListView {
            list: self.resolver.resolve(list),
            ipsets: config.list_references(name),
        })
    }

    /// 引用指定列表的 IPSet 名称
    pub fn list_references(&self, name: &str) -> Result<Vec<String>, AppError> {
        Ok(self.store.load()?.list_references(name))
    }

    /// 新建远程列表并挂到目标 IPSet 上，两处修改一次写入
    pub fn create_list(&self, request: NewList) -> Result<(), AppError> {
        let name = required(&request.name, "name")?;
        let url = required(&request.url, "url")?;
        let target = required(&request.ipset, "ipset")?;

        Url::parse(&url).map_err(|e| AppError::InvalidRequest(format!("invalid url: {}", e)))?;

        let list = ListConfig::new(name.clone(), ListSource::Url { url });
        self.store
            .update(|config| attach_list(config, list, &target))?;

        info!("List '{}' created and attached to ipset '{}'", name, target);
        Ok(())
    }

    /// 删除列表，级联清理引用
    pub fn delete_list(&self, name: &str) -> Result<(), AppError> {
        let removed = self.store.update(|config| detach_list(config, name))?;

        info!("List '{}' ({}) deleted", name, removed.kind().as_str());
        Ok(())
    }

    /// 替换列表条目
    ///
    /// 文件列表只写文件，内联列表只写配置文档，远程列表不可编辑。
    pub fn update_list_entries(&self, name: &str, entries: Vec<String>) -> Result<(), AppError> {
        let count = entries.len();
        let guard = self.store.lock();
        let mut config = self.store.load()?;
        let source = config
            .find_list(name)
            .map(|l| l.source.clone())
            .ok_or_else(|| AppError::ListNotFound(name.to_string()))?;

        match source {
            ListSource::Url { .. } => {
                return Err(AppError::ReadOnlyList(name.to_string()));
            }
            ListSource::File { path } => {
                let file_path = self.resolver.file_path(&path);
                write_atomic(&file_path, &format_list_entries(&entries))?;
                METRICS
                    .config_writes_total()
                    .with_label_values(&[write_mode_labels::LIST_FILE])
                    .inc();
                debug!("List '{}' file rewritten", name);
            }
            ListSource::Inline { .. } => {
                if let Some(list) = config.find_list_mut(name) {
                    list.source = ListSource::Inline { hosts: entries };
                }
                self.store.save_locked(&guard, &config)?;
            }
        }

        info!("List '{}' updated with {} entries", name, count);
        Ok(())
    }
}

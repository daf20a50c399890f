// 编辑协调器
//
// 两个独立入口写同一份文档：结构化编辑整体替换配置，原始编辑校验语法后直接写入文本。
// 两者之间没有合并逻辑，后写入者生效；写入本身由存储层的锁串行化。

use crate::config::Config;
use crate::error::AppError;
use crate::store::ConfigStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// 服务状态概要
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub config_path: String,
    pub lists_count: usize,
    pub ipsets_count: usize,
}

/// 配置编辑协调器
pub struct ConfigEditor {
    store: Arc<ConfigStore>,
}

impl ConfigEditor {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }

    /// 读取结构化配置
    pub fn get_config(&self) -> Result<Config, AppError> {
        Ok(self.store.load()?)
    }

    /// 读取原始配置文本
    pub fn get_config_raw(&self) -> Result<String, AppError> {
        Ok(self.store.load_raw()?)
    }

    /// 结构化编辑：整体替换配置
    ///
    /// 只做解码级校验（字段、名称唯一、来源唯一），不拒绝悬空的列表引用。
    pub fn put_config(&self, config: Config) -> Result<(), AppError> {
        config.validate().map_err(AppError::InvalidDocument)?;
        self.store.save(&config)?;

        info!(
            "Configuration replaced: {} ipsets, {} lists",
            config.ipsets.len(),
            config.lists.len()
        );
        warn_dangling(&config);
        Ok(())
    }

    /// 原始编辑：校验能够解析后原样写入
    pub fn put_config_raw(&self, content: &str) -> Result<(), AppError> {
        let config = self.store.save_raw(content).map_err(AppError::rejected)?;

        info!("Raw configuration replaced ({} bytes)", content.len());
        warn_dangling(&config);
        Ok(())
    }

    /// 状态概要，配置不可读时计数为 0
    pub fn status(&self) -> StatusInfo {
        let mut status = StatusInfo {
            config_path: self.store.path().display().to_string(),
            lists_count: 0,
            ipsets_count: 0,
        };

        match self.store.load() {
            Ok(config) => {
                status.lists_count = config.lists.len();
                status.ipsets_count = config.ipsets.len();
            }
            Err(e) => warn!("Status requested but configuration is unreadable: {}", e),
        }

        status
    }
}

// 悬空引用只记录，不拒绝
fn warn_dangling(config: &Config) {
    for (ipset, list) in config.dangling_references() {
        warn!("IPSet '{}' references missing list '{}'", ipset, list);
    }
}

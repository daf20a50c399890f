// src/api/state.rs

use crate::actions::ActionRunner;
use crate::editor::ConfigEditor;
use crate::integrity::ListManager;
use std::sync::Arc;

/// 应用程序状态结构体
#[derive(Clone)]
pub struct AppState {
    /// 配置编辑协调器
    pub editor: Arc<ConfigEditor>,
    /// 列表管理器
    pub lists: Arc<ListManager>,
    /// 外部操作执行器
    pub actions: Arc<ActionRunner>,
}

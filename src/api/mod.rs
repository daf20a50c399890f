// src/api/mod.rs
//
// HTTP API 模块实现，对外提供:
// - 配置读写：结构化 JSON 与原始 TOML 文本两种方式
// - 列表管理：查询、创建、删除、编辑条目
// - 外部操作：下载、应用、自检等
// - 健康检查与指标

// 子模块定义
pub mod handlers;
pub mod models;
pub mod server;
pub mod state;

// 公开导出
pub use server::{create_router, ApiServer};
pub use state::AppState;

pub mod actions;
pub mod api;
pub mod args;
pub mod config;
pub mod r#const;
pub mod editor;
pub mod error;
pub mod integrity;
pub mod metrics;
pub mod resolver;
pub mod store;

// 重导出常用组件
pub use actions::{Action, ActionResult, ActionRunner, CommandRunner, SystemCommandRunner};
pub use api::{ApiServer, AppState};
pub use args::Args;
pub use config::{Config, ListConfig, ListSource, SourceKind};
pub use editor::ConfigEditor;
pub use error::{AppError, ConfigError, ErrorKind};
pub use integrity::{ListManager, ListView, NewList};
pub use r#const::subsystem_names;
pub use resolver::{ListResolver, ResolvedList};
pub use store::ConfigStore;

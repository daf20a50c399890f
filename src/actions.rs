// 外部命令调用
//
// 下载、应用、自检等操作都交给 keen-pbr 及 init 脚本完成，
// 这里只负责启动进程并收集输出。

use crate::error::AppError;
use crate::metrics::METRICS;
use crate::r#const::{action_result_labels, commands};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// 命令执行结果
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ActionResult {
    /// 进程是否成功退出
    pub success: bool,
    /// 标准输出与标准错误
    pub output: String,
}

impl ActionResult {
    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }
}

/// 可触发的外部操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // 下载远程列表
    Download,
    // 重启 keen-pbr 与 dnsmasq
    Apply,
    // 自检
    SelfCheck,
    // 撤销路由
    UndoRouting,
    // 列出网络接口
    Interfaces,
    // 输出 dnsmasq 配置
    DnsmasqConfig,
    // DNS 状态
    Dns,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Download => "download",
            Action::Apply => "apply",
            Action::SelfCheck => "self-check",
            Action::UndoRouting => "undo-routing",
            Action::Interfaces => "interfaces",
            Action::DnsmasqConfig => "dnsmasq-config",
            Action::Dns => "dns",
        }
    }

    // 直接映射到 keen-pbr 子命令的操作
    fn keen_pbr_arg(&self) -> Option<&'static str> {
        match self {
            Action::Download => Some(commands::args::DOWNLOAD),
            Action::SelfCheck => Some(commands::args::SELF_CHECK),
            Action::UndoRouting => Some(commands::args::UNDO_ROUTING),
            Action::Interfaces => Some(commands::args::INTERFACES),
            Action::DnsmasqConfig => Some(commands::args::PRINT_DNSMASQ_CONFIG),
            Action::Dns => Some(commands::args::DNS),
            Action::Apply => None,
        }
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "download" => Ok(Action::Download),
            "apply" => Ok(Action::Apply),
            "self-check" => Ok(Action::SelfCheck),
            "undo-routing" => Ok(Action::UndoRouting),
            "interfaces" => Ok(Action::Interfaces),
            "dnsmasq-config" => Ok(Action::DnsmasqConfig),
            "dns" => Ok(Action::Dns),
            _ => Err(AppError::UnknownAction(s.to_string())),
        }
    }
}

/// 进程执行接口
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// 执行命令并返回合并后的输出
    async fn run(&self, program: &str, args: &[&str]) -> ActionResult;
}

/// 基于 tokio::process 的实现
pub struct SystemCommandRunner {
    timeout: Duration,
}

impl SystemCommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SystemCommandRunner {
    fn default() -> Self {
        Self::new(Duration::from_secs(commands::TIMEOUT_SECS))
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> ActionResult {
        debug!("Running command: {} {:?}", program, args);

        let child = Command::new(program).args(args).kill_on_drop(true).output();
        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!("Failed to start '{}': {}", program, e);
                return ActionResult::failed(e.to_string());
            }
            Err(_) => {
                warn!("Command '{}' timed out after {:?}", program, self.timeout);
                return ActionResult::failed(format!(
                    "command timed out after {}s",
                    self.timeout.as_secs()
                ));
            }
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        ActionResult {
            success: output.status.success(),
            output: combined,
        }
    }
}

/// 外部操作执行器
pub struct ActionRunner {
    runner: Arc<dyn CommandRunner>,
    keen_pbr: String,
    init_dir: PathBuf,
}

impl ActionRunner {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        keen_pbr: impl Into<String>,
        init_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            keen_pbr: keen_pbr.into(),
            init_dir: init_dir.into(),
        }
    }

    /// 执行操作
    pub async fn run(&self, action: Action) -> ActionResult {
        let result = match action.keen_pbr_arg() {
            Some(arg) => self.runner.run(&self.keen_pbr, &[arg]).await,
            None => self.apply().await,
        };

        let label = if result.success {
            action_result_labels::SUCCESS
        } else {
            action_result_labels::FAILURE
        };
        METRICS
            .action_runs_total()
            .with_label_values(&[action.as_str(), label])
            .inc();
        info!("Action '{}' finished, success: {}", action.as_str(), result.success);

        result
    }

    // 依次重启 keen-pbr 和 dnsmasq，两者都成功才算成功
    async fn apply(&self) -> ActionResult {
        let services = [
            ("keen-pbr", commands::KEEN_PBR_SERVICE),
            ("dnsmasq", commands::DNSMASQ_SERVICE),
        ];

        let mut success = true;
        let mut sections = Vec::with_capacity(services.len());
        for (name, script) in services {
            let script = self.init_dir.join(script);
            let result = self
                .runner
                .run(&script.to_string_lossy(), &[commands::args::RESTART])
                .await;
            success &= result.success;
            sections.push(format!("=== {} restart ===\n{}", name, result.output));
        }

        ActionResult {
            success,
            output: sections.join("\n\n"),
        }
    }
}

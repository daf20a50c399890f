use crate::error::AppError;
use crate::r#const::{commands, server_defaults, shutdown_timeout};
use clap::{ArgAction, Parser};
use std::net::SocketAddr;
use std::path::PathBuf;

// keen-pbr 配置编辑服务
#[derive(Parser, Debug, Clone)]
#[command(
    name = "keenpbr-web",
    author,
    version,
    about = "A lightweight web editor for keen-pbr policy-based-routing configuration\n\n\
             Key Features:\n\
             - Structured Editing: General settings, IPSets and lists as JSON\n\
             - Raw Editing: Full TOML document, validated before it is written\n\
             - List Management: Inline, file-backed and URL-backed lists with reference tracking\n\
             - Safe Persistence: Atomic replace of the configuration file, serialized writers\n\
             - Actions: Download, apply and self-check through keen-pbr"
)]
pub struct Args {
    // 配置文件路径
    #[arg(short, long, default_value = server_defaults::DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    // HTTP 监听地址
    #[arg(
        short,
        long,
        default_value = server_defaults::DEFAULT_LISTEN,
        help = "HTTP listen address"
    )]
    pub listen: SocketAddr,

    // 测试配置
    #[arg(
        short = 't',
        long = "test",
        action = ArgAction::SetTrue,
        help = "Test configuration file for validity and exit"
    )]
    pub test_config: bool,

    // 启用调试日志
    #[arg(
        short = 'd',
        long = "debug",
        action = ArgAction::SetTrue,
        help = "Enable debug level logging for detailed output"
    )]
    pub debug: bool,

    // 关闭超时
    #[arg(
        long = "shutdown-timeout",
        help = "Maximum time in seconds to wait for complete shutdown",
        default_value_t = shutdown_timeout::DEFAULT
    )]
    pub shutdown_timeout: u64,

    // keen-pbr 可执行文件
    #[arg(
        long = "keen-pbr",
        help = "Path or name of the keen-pbr executable",
        default_value = commands::DEFAULT_KEEN_PBR
    )]
    pub keen_pbr: String,

    // init 脚本目录
    #[arg(
        long = "init-dir",
        help = "Directory containing the keen-pbr and dnsmasq init scripts",
        default_value = commands::DEFAULT_INIT_DIR
    )]
    pub init_dir: PathBuf,
}

impl Args {
    // 解析命令行参数
    pub fn parse_args() -> Self {
        Args::parse()
    }

    // 验证参数
    pub fn validation(&self) -> Result<(), AppError> {
        if self.shutdown_timeout < shutdown_timeout::MIN
            || self.shutdown_timeout > shutdown_timeout::MAX
        {
            return Err(AppError::InvalidShutdownTimeout);
        }
        Ok(())
    }
}

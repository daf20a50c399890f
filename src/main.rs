use keenpbr_web::{
    subsystem_names, ActionRunner, ApiServer, AppState, Args, Config, ConfigEditor, ConfigStore,
    ListManager, SystemCommandRunner,
};
use mimalloc::MiMalloc;
use std::process;
use std::sync::Arc;
use tokio_graceful_shutdown::{SubsystemBuilder, Toplevel};
use tracing::{error, info, warn};

// 使用 mimalloc 分配器提高内存效率
#[global_allocator]
static GLOBAL: MiMalloc = mimalloc::MiMalloc;

fn init_logging(args: &Args) {
    let builder = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_line_number(false);

    // 如果启用调试模式，输出调试信息，否则只输出 info 及以上级别
    if args.debug {
        builder.with_max_level(tracing::Level::DEBUG)
    } else {
        builder.with_max_level(tracing::Level::INFO)
    }
    .init();
}

// 程序入口
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 解析命令行参数
    let args = Args::parse_args();

    // 初始化日志
    init_logging(&args);

    // 验证参数
    if let Err(e) = args.validation() {
        error!("Invalid command line arguments: {}", e);
        process::exit(1);
    }

    info!("Starting keen-pbr configuration editor");

    // 检查配置文件，服务在配置不可读时仍然启动，便于通过原始编辑修复
    match Config::from_file(&args.config) {
        Ok(config) => {
            info!(
                "Configuration loaded: {:?} ({} ipsets, {} lists)",
                args.config,
                config.ipsets.len(),
                config.lists.len()
            );
            for (ipset, list) in config.dangling_references() {
                warn!("IPSet '{}' references missing list '{}'", ipset, list);
            }
        }
        Err(e) => {
            if args.test_config {
                error!("Configuration file validation failed: {}", e);
                process::exit(1);
            }
            warn!("Configuration file is not valid yet: {}", e);
        }
    }

    // 如果是测试模式，成功验证配置后退出
    if args.test_config {
        info!("Configuration file validation successful");
        return Ok(());
    }

    // 创建应用组件
    let state = create_state(&args);
    let api_server = ApiServer::new(args.listen, state);

    // 创建优雅关闭顶层管理器
    let toplevel = Toplevel::new(|s| async move {
        // 启动API服务器子系统
        s.start(SubsystemBuilder::new(
            subsystem_names::API_SERVER,
            move |s| async move { api_server.run(s).await },
        ));
    });

    // 等待关闭
    info!("All services started, waiting for requests...");
    match toplevel
        .catch_signals()
        .handle_shutdown_requests(tokio::time::Duration::from_secs(args.shutdown_timeout))
        .await
    {
        Ok(_) => {
            info!("Application gracefully shut down");
            Ok(())
        }
        Err(e) => {
            error!("Application shutdown error: {}", e);
            process::exit(1);
        }
    }
}

// 创建应用组件
fn create_state(args: &Args) -> AppState {
    let store = Arc::new(ConfigStore::new(&args.config));
    let editor = Arc::new(ConfigEditor::new(Arc::clone(&store)));
    let lists = Arc::new(ListManager::new(store));
    let actions = Arc::new(ActionRunner::new(
        Arc::new(SystemCommandRunner::default()),
        args.keen_pbr.clone(),
        args.init_dir.clone(),
    ));

    AppState {
        editor,
        lists,
        actions,
    }
}

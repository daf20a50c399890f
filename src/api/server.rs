// src/api/server.rs

use crate::api::handlers::{
    create_list, delete_list, get_config, get_config_raw, get_list, health, list_all, put_config,
    put_config_raw, run_action, status, update_list,
};
use crate::api::state::AppState;
use crate::error::AppError;
use crate::metrics;
use crate::r#const::api_paths;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_graceful_shutdown::SubsystemHandle;
use tracing::{error, info};

/// 创建应用路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // 配置读写
        .route(api_paths::CONFIG, get(get_config).put(put_config))
        .route(api_paths::CONFIG_RAW, get(get_config_raw).put(put_config_raw))
        // 列表管理
        .route(api_paths::LISTS, get(list_all).post(create_list))
        .route(
            api_paths::LIST,
            get(get_list).put(update_list).delete(delete_list),
        )
        // 外部操作
        .route(api_paths::ACTION, post(run_action))
        .route(api_paths::STATUS, get(status))
        // 健康检查与指标
        .route(api_paths::HEALTH, get(health))
        .merge(metrics::metrics_routes())
        // 添加应用程序状态
        .with_state(state)
}

/// API 服务器结构体
pub struct ApiServer {
    /// 监听地址
    bind_addr: SocketAddr,
    /// 应用程序状态
    state: AppState,
    /// 关闭信号发送端
    shutdown_tx: oneshot::Sender<()>,
    /// 关闭信号接收端
    shutdown_rx: oneshot::Receiver<()>,
}

impl ApiServer {
    /// 创建新的 API 服务器
    pub fn new(bind_addr: SocketAddr, state: AppState) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        Self {
            bind_addr,
            state,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// 启动 API 服务器
    pub async fn run(self, subsys: SubsystemHandle) -> Result<(), AppError> {
        // 创建路由
        let app = create_router(self.state.clone());

        // 创建 TCP 监听器
        let listener = match TcpListener::bind(self.bind_addr).await {
            Ok(listener) => {
                info!("API server listening on {}", self.bind_addr);
                listener
            }
            Err(e) => {
                error!("Failed to bind API server: {}", e);
                return Err(AppError::Io(e));
            }
        };

        // 获取关闭信号接收端
        let shutdown_rx = self.shutdown_rx;

        // 启动 HTTP 服务器
        tokio::select! {
            result = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("API server received shutdown signal");
            }) => {
                if let Err(e) = result {
                    error!("API server error: {}", e);
                } else {
                    info!("API server completed normally");
                }
                Ok(())
            }
            _ = subsys.on_shutdown_requested() => {
                info!("Shutdown requested, stopping API server");
                let _ = self.shutdown_tx.send(());
                Ok(())
            }
        }
    }
}

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{routing::get, Router};
use once_cell::sync::Lazy;
use prometheus::{opts, HistogramVec, IntCounterVec, Registry};
use tracing::error;

use crate::r#const::api_paths;

// 全局静态指标实例
pub static METRICS: Lazy<EditorMetrics> = Lazy::new(EditorMetrics::new);

// 配置编辑服务指标
pub struct EditorMetrics {
    registry: Registry,

    // 1. API 请求指标
    api_requests_total: IntCounterVec,
    api_errors_total: IntCounterVec,
    api_request_duration_seconds: HistogramVec,

    // 2. 写入指标
    config_writes_total: IntCounterVec,

    // 3. 外部命令指标
    action_runs_total: IntCounterVec,
}

impl Default for EditorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorMetrics {
    // 创建新的指标收集器
    pub fn new() -> Self {
        let registry = Registry::new();

        // 1. API 请求指标
        let api_requests_total = IntCounterVec::new(
            opts!(
                "keenpbr_api_requests_total",
                "Total API requests handled, classified by operation"
            ),
            &["operation"],
        )
        .unwrap();

        let api_errors_total = IntCounterVec::new(
            opts!(
                "keenpbr_api_errors_total",
                "Total API request failures, classified by operation and error kind"
            ),
            &["operation", "kind"],
        )
        .unwrap();

        let api_request_duration_seconds = HistogramVec::new(
            prometheus::histogram_opts!(
                "keenpbr_api_request_duration_seconds",
                "API request processing duration in seconds, classified by operation",
                vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0, 30.0]
            ),
            &["operation"],
        )
        .unwrap();

        // 2. 写入指标
        let config_writes_total = IntCounterVec::new(
            opts!(
                "keenpbr_config_writes_total",
                "Total successful writes, classified by mode (structured, raw, list_file)"
            ),
            &["mode"],
        )
        .unwrap();

        // 3. 外部命令指标
        let action_runs_total = IntCounterVec::new(
            opts!(
                "keenpbr_action_runs_total",
                "Total external action invocations, classified by action and result"
            ),
            &["action", "result"],
        )
        .unwrap();

        let metrics = EditorMetrics {
            registry,
            api_requests_total,
            api_errors_total,
            api_request_duration_seconds,
            config_writes_total,
            action_runs_total,
        };

        // 注册所有指标
        metrics.register_all_metrics();

        metrics
    }

    // 注册所有指标
    fn register_all_metrics(&self) {
        self.registry
            .register(Box::new(self.api_requests_total.clone()))
            .unwrap();
        self.registry
            .register(Box::new(self.api_errors_total.clone()))
            .unwrap();
        self.registry
            .register(Box::new(self.api_request_duration_seconds.clone()))
            .unwrap();
        self.registry
            .register(Box::new(self.config_writes_total.clone()))
            .unwrap();
        self.registry
            .register(Box::new(self.action_runs_total.clone()))
            .unwrap();
    }

    // 导出所有指标为文本
    pub fn export_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = String::new();
        encoder.encode_utf8(&metric_families, &mut buffer)?;
        Ok(buffer)
    }

    pub fn api_requests_total(&self) -> &IntCounterVec {
        &self.api_requests_total
    }

    pub fn api_errors_total(&self) -> &IntCounterVec {
        &self.api_errors_total
    }

    pub fn api_request_duration_seconds(&self) -> &HistogramVec {
        &self.api_request_duration_seconds
    }

    pub fn config_writes_total(&self) -> &IntCounterVec {
        &self.config_writes_total
    }

    pub fn action_runs_total(&self) -> &IntCounterVec {
        &self.action_runs_total
    }
}

// 指标导出处理程序
async fn metrics_handler() -> impl IntoResponse {
    match METRICS.export_metrics() {
        Ok(buffer) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            buffer,
        ),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
                String::new(),
            )
        }
    }
}

// 提供指标导出路由
pub fn metrics_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(api_paths::METRICS, get(metrics_handler))
}

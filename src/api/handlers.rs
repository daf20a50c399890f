// src/api/handlers.rs

use crate::actions::{Action, ActionResult};
use crate::api::models::{StatusResponse, UpdateEntriesRequest};
use crate::api::state::AppState;
use crate::config::Config;
use crate::editor::StatusInfo;
use crate::error::{AppError, ErrorKind};
use crate::integrity::{ListView, NewList};
use crate::metrics::METRICS;
use crate::r#const::{http_headers, operation_labels};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, error, warn};

/// 记录请求计数、耗时与错误
fn record<T>(operation: &'static str, start: Instant, result: &Result<T, AppError>) {
    METRICS
        .api_request_duration_seconds()
        .with_label_values(&[operation])
        .observe(start.elapsed().as_secs_f64());

    if let Err(e) = result {
        let kind = e.kind();
        METRICS
            .api_errors_total()
            .with_label_values(&[operation, kind.as_label()])
            .inc();
        match kind {
            ErrorKind::Io | ErrorKind::Internal => error!("{} failed: {}", operation, e),
            _ if matches!(e, AppError::Config(_)) => error!("{} failed: {}", operation, e),
            _ => warn!("{} rejected: {}", operation, e),
        }
    }
}

/// 在阻塞线程池中执行核心操作
///
/// 核心层只做本地文件 I/O，全部是同步调用。
async fn run_blocking<T, F>(operation: &'static str, task: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let start = Instant::now();
    METRICS
        .api_requests_total()
        .with_label_values(&[operation])
        .inc();

    let result = match tokio::task::spawn_blocking(task).await {
        Ok(result) => result,
        Err(e) => Err(AppError::Internal(format!("blocking task failed: {}", e))),
    };

    record(operation, start, &result);
    debug!("{} processed in {:?}", operation, start.elapsed());
    result
}

/// 解析 JSON 请求体
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::InvalidBody(format!("invalid JSON: {}", e)))
}

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> Result<Json<Config>, AppError> {
    let editor = state.editor.clone();
    let config = run_blocking(operation_labels::GET_CONFIG, move || editor.get_config()).await?;
    Ok(Json(config))
}

/// PUT /api/config
///
/// 结构化编辑：整体替换配置，后写入者生效
pub async fn put_config(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, AppError> {
    let editor = state.editor.clone();
    run_blocking(operation_labels::PUT_CONFIG, move || {
        let config: Config = parse_json(&body)?;
        editor.put_config(config)
    })
    .await?;
    Ok(Json(StatusResponse::ok()))
}

/// GET /api/config/raw
pub async fn get_config_raw(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let editor = state.editor.clone();
    let content =
        run_blocking(operation_labels::GET_CONFIG_RAW, move || editor.get_config_raw()).await?;
    Ok((
        [(header::CONTENT_TYPE, http_headers::content_types::TEXT_PLAIN)],
        content,
    ))
}

/// PUT /api/config/raw
///
/// 原始编辑：文本必须能解析为合法配置，否则不写入
pub async fn put_config_raw(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<StatusResponse>, AppError> {
    let editor = state.editor.clone();
    run_blocking(operation_labels::PUT_CONFIG_RAW, move || {
        editor.put_config_raw(&body)
    })
    .await?;
    Ok(Json(StatusResponse::ok()))
}

/// GET /api/lists
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<ListView>>, AppError> {
    let lists = state.lists.clone();
    let views = run_blocking(operation_labels::LIST_ALL, move || lists.list_all()).await?;
    Ok(Json(views))
}

/// GET /api/lists/{name}
pub async fn get_list(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ListView>, AppError> {
    let lists = state.lists.clone();
    let view = run_blocking(operation_labels::LIST_GET, move || lists.get_list(&name)).await?;
    Ok(Json(view))
}

/// POST /api/lists
pub async fn create_list(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, AppError> {
    let lists = state.lists.clone();
    run_blocking(operation_labels::LIST_CREATE, move || {
        let request: NewList = parse_json(&body)?;
        lists.create_list(request)
    })
    .await?;
    Ok(Json(StatusResponse::ok()))
}

/// PUT /api/lists/{name}
pub async fn update_list(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<StatusResponse>, AppError> {
    let lists = state.lists.clone();
    run_blocking(operation_labels::LIST_UPDATE, move || {
        let request: UpdateEntriesRequest = parse_json(&body)?;
        lists.update_list_entries(&name, request.entries)
    })
    .await?;
    Ok(Json(StatusResponse::ok()))
}

/// DELETE /api/lists/{name}
pub async fn delete_list(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    let lists = state.lists.clone();
    run_blocking(operation_labels::LIST_DELETE, move || lists.delete_list(&name)).await?;
    Ok(Json(StatusResponse::ok()))
}

/// POST /api/actions/{action}
pub async fn run_action(
    State(state): State<AppState>,
    Path(action): Path<String>,
) -> Result<Json<ActionResult>, AppError> {
    let start = Instant::now();
    METRICS
        .api_requests_total()
        .with_label_values(&[operation_labels::ACTION])
        .inc();

    let result = match action.parse::<Action>() {
        Ok(action) => Ok(state.actions.run(action).await),
        Err(e) => Err(e),
    };
    record(operation_labels::ACTION, start, &result);
    Ok(Json(result?))
}

/// GET /api/status
pub async fn status(State(state): State<AppState>) -> Result<Json<StatusInfo>, AppError> {
    let editor = state.editor.clone();
    let status = run_blocking(operation_labels::STATUS, move || Ok(editor.status())).await?;
    Ok(Json(status))
}

/// GET /health
pub async fn health() -> &'static str {
    "OK"
}

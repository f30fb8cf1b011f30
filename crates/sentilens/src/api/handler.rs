use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Json, Query};
use chrono::Utc;
use utoipa::OpenApi;

use crate::api::request::{AnalyzeRequest, LimitQuery};
use crate::api::response::{AnalysisRecord, AnalyzeResponse, MessageResponse};
use crate::api::wrapper::{ApiError, ApiResponse};
use crate::built_info;
use crate::dashboard::{self, ActivityItem, DashboardSummary};
use crate::service::AnalysisService;

const DEFAULT_HISTORY_LIMIT: u64 = 20;
const DEFAULT_ACTIVITY_LIMIT: u64 = 10;

#[derive(OpenApi)]
#[openapi(
    paths(analyze, list_analyses, get_dashboard_summary, get_dashboard_posts),
    components(schemas(MessageResponse))
)]
pub struct ApiDoc;

pub async fn root() -> String {
    format!("Sentiment Analysis API Running (v{})", built_info::PKG_VERSION)
}

/// 对一段文本做情感分析并保存结果
#[utoipa::path(
    post,
    path = "/api/analyses",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "分析成功", body = AnalyzeResponse),
        (status = 400, description = "文本为空或请求体格式错误", body = MessageResponse),
        (status = 500, description = "数据库或打分失败", body = MessageResponse),
    )
)]
pub async fn analyze(
    Extension(service): Extension<Arc<AnalysisService>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<ApiResponse<AnalyzeResponse>, ApiError> {
    let Json(request) = payload?;

    let analyzed = service
        .analyze(request.text.as_deref(), request.platform.as_deref())
        .await?;

    Ok(ApiResponse::ok(analyzed.into()))
}

/// 获取最近的分析记录（按时间倒序）
#[utoipa::path(
    get,
    path = "/api/analyses",
    params(LimitQuery),
    responses(
        (status = 200, description = "获取成功", body = Vec<AnalysisRecord>),
        (status = 500, description = "内部错误", body = MessageResponse),
    )
)]
pub async fn list_analyses(
    Extension(service): Extension<Arc<AnalysisService>>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<AnalysisRecord>>, ApiError> {
    let Query(query) = query?;
    let limit = query.limit_or(DEFAULT_HISTORY_LIMIT);

    let records = service.repository().recent(limit).await?;
    Ok(ApiResponse::ok(records.into_iter().map(AnalysisRecord::from).collect()))
}

/// 仪表盘汇总：总数与各情感占比
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    responses(
        (status = 200, description = "获取成功", body = DashboardSummary),
        (status = 500, description = "内部错误", body = MessageResponse),
    )
)]
pub async fn get_dashboard_summary(
    Extension(service): Extension<Arc<AnalysisService>>,
) -> Result<ApiResponse<DashboardSummary>, ApiError> {
    let summary = dashboard::summary(service.repository()).await?;
    Ok(ApiResponse::ok(summary))
}

/// 仪表盘最近动态，时间为相对描述
#[utoipa::path(
    get,
    path = "/api/dashboard/posts",
    params(LimitQuery),
    responses(
        (status = 200, description = "获取成功", body = Vec<ActivityItem>),
        (status = 500, description = "内部错误", body = MessageResponse),
    )
)]
pub async fn get_dashboard_posts(
    Extension(service): Extension<Arc<AnalysisService>>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<ActivityItem>>, ApiError> {
    let Query(query) = query?;
    let limit = query.limit_or(DEFAULT_ACTIVITY_LIMIT);

    let items = dashboard::recent_activity(service.repository(), limit, Utc::now()).await?;
    Ok(ApiResponse::ok(items))
}

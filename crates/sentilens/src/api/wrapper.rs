use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use crate::api::error::InnerApiError;
use crate::api::response::MessageResponse;
use crate::service::AnalyzeError;

/// 成功响应，直接序列化数据本身
pub struct ApiResponse<T: Serialize> {
    status_code: StatusCode,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status_code: StatusCode::OK,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code, Json(self.data)).into_response()
    }
}

/// 失败响应，统一为 `{"msg": ...}`
#[derive(Debug)]
pub struct ApiError(InnerApiError);

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            InnerApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            InnerApiError::Storage(_) | InnerApiError::Analysis(_) | InnerApiError::Query(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<InnerApiError> for ApiError {
    fn from(err: InnerApiError) -> Self {
        Self(err)
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self(InnerApiError::Query(err))
    }
}

impl From<AnalyzeError> for ApiError {
    fn from(err: AnalyzeError) -> Self {
        let inner = match err {
            AnalyzeError::InvalidInput => InnerApiError::BadRequest("Please provide text to analyze".to_string()),
            AnalyzeError::Dependency(msg) => InnerApiError::Analysis(msg),
            AnalyzeError::Storage(e) => InnerApiError::Storage(e),
        };
        Self(inner)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(InnerApiError::BadRequest(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(InnerApiError::BadRequest(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self.0 {
            InnerApiError::BadRequest(msg) => warn!("请求参数错误: {}", msg),
            InnerApiError::Storage(e) => error!("数据库错误，请检查数据库连接串: {}", e),
            InnerApiError::Analysis(msg) => error!("情感分析失败: {}", msg),
            InnerApiError::Query(e) => error!("查询分析记录失败: {}", e),
        }

        let detail = match &self.0 {
            InnerApiError::Analysis(detail) => Some(detail.clone()),
            _ => None,
        };
        let body = MessageResponse {
            msg: self.0.to_string(),
            error: detail,
        };
        (status, Json(body)).into_response()
    }
}

use thiserror::Error;

/// 接口层错误，`Display` 即返回给前端的 msg
#[derive(Error, Debug)]
pub enum InnerApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Database Connection Error. Please check server logs.")]
    Storage(#[source] sea_orm::DbErr),
    #[error("Server Error during analysis")]
    Analysis(String),
    #[error("Server Error")]
    Query(#[from] sea_orm::DbErr),
}

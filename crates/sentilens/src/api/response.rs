use chrono::{DateTime, Utc};
use sentilens_entity::analysis::{self, Sentiment};
use serde::Serialize;
use utoipa::ToSchema;

use crate::service::Analyzed;

/// 情感分析接口的返回，emotion 与 sarcasm 目前为固定占位值
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeResponse {
    #[schema(value_type = String)]
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub keywords: Vec<String>,
    pub emotion: String,
    pub sarcasm: bool,
}

impl From<Analyzed> for AnalyzeResponse {
    fn from(analyzed: Analyzed) -> Self {
        Self {
            sentiment: analyzed.outcome.sentiment,
            confidence: analyzed.outcome.confidence,
            keywords: analyzed.outcome.keywords,
            emotion: "Neutral".to_string(),
            sarcasm: false,
        }
    }
}

/// 历史记录，字段名与旧版前端保持一致
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalysisRecord {
    #[serde(rename = "_id")]
    pub id: i32,
    pub text: String,
    #[schema(value_type = String)]
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub keywords: Vec<String>,
    pub platform: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<analysis::Model> for AnalysisRecord {
    fn from(model: analysis::Model) -> Self {
        Self {
            id: model.id,
            text: model.text,
            sentiment: model.sentiment,
            confidence: model.confidence,
            keywords: model.keywords.0,
            platform: model.platform,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub msg: String,
    /// 仅在打分失败时返回具体原因
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

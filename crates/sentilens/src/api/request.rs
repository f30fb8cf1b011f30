use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// 单次请求允许返回的最大条数
pub const MAX_LIMIT: u64 = 100;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// 待分析文本，缺失或为空时返回 400
    pub text: Option<String>,
    /// 来源平台，缺省为服务配置的默认平台
    pub platform: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitQuery {
    /// 返回条数，最大 100
    pub limit: Option<u64>,
}

impl LimitQuery {
    pub fn limit_or(&self, default: u64) -> u64 {
        self.limit.unwrap_or(default).clamp(1, MAX_LIMIT)
    }
}

use std::sync::Arc;

use chrono::Utc;
use sea_orm::DbErr;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::realtime::{NewAnalysisEvent, PublishError, Publisher, RealtimeEvent, JUST_NOW};
use crate::sentiment::{ScoreError, ScoreOutcome, SentimentScorer};
use crate::store::{AnalysisRepository, NewAnalysis};

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("text to analyze is empty")]
    InvalidInput,
    #[error("scoring failed: {0}")]
    Dependency(String),
    #[error("failed to persist analysis: {0}")]
    Storage(#[from] DbErr),
}

impl From<ScoreError> for AnalyzeError {
    fn from(err: ScoreError) -> Self {
        match err {
            ScoreError::InvalidInput => AnalyzeError::InvalidInput,
            ScoreError::Dependency(msg) => AnalyzeError::Dependency(msg),
        }
    }
}

/// 一次成功分析的结果：打分结果与入库后的记录 id
#[derive(Debug, Clone)]
pub struct Analyzed {
    pub id: i32,
    pub outcome: ScoreOutcome,
}

/// 校验 -> 打分 -> 入库 -> 推送
pub struct AnalysisService {
    scorer: SentimentScorer,
    repository: Arc<dyn AnalysisRepository>,
    publisher: Arc<dyn Publisher>,
    default_platform: String,
}

impl AnalysisService {
    pub fn new(
        scorer: SentimentScorer,
        repository: Arc<dyn AnalysisRepository>,
        publisher: Arc<dyn Publisher>,
        default_platform: String,
    ) -> Self {
        Self {
            scorer,
            repository,
            publisher,
            default_platform,
        }
    }

    pub fn repository(&self) -> &dyn AnalysisRepository {
        self.repository.as_ref()
    }

    pub async fn analyze(&self, text: Option<&str>, platform: Option<&str>) -> Result<Analyzed, AnalyzeError> {
        let outcome = self.scorer.score(text)?;
        // score 已保证文本非空
        let text = text.unwrap_or_default().to_string();

        let platform = platform
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(self.default_platform.as_str())
            .to_string();

        // 只尝试写入一次，失败直接返回
        let record = self
            .repository
            .insert(NewAnalysis {
                text,
                sentiment: outcome.sentiment,
                confidence: outcome.confidence,
                keywords: outcome.keywords.clone(),
                platform,
                created_at: Utc::now(),
            })
            .await
            .map_err(|e| {
                error!("保存分析记录失败: {}", e);
                AnalyzeError::Storage(e)
            })?;

        info!(
            id = record.id,
            sentiment = %record.sentiment,
            confidence = record.confidence,
            "完成情感分析"
        );

        let event = RealtimeEvent::NewAnalysis(NewAnalysisEvent {
            id: record.id,
            text: record.text,
            sentiment: record.sentiment,
            platform: record.platform,
            date: JUST_NOW.to_string(),
        });
        let event_name = event.name();

        // 推送失败不影响本次分析结果
        match self.publisher.publish(event) {
            Ok(receivers) => debug!("已推送 {} 事件给 {} 个订阅者", event_name, receivers),
            Err(PublishError::NoSubscribers) => debug!("没有在线订阅者，跳过推送 {}", event_name),
            Err(e) => warn!("推送 {} 事件失败: {}", event_name, e),
        }

        Ok(Analyzed { id: record.id, outcome })
    }
}

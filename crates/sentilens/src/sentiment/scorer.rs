use std::sync::Arc;

use sentilens_entity::analysis::Sentiment;
use serde::Serialize;
use thiserror::Error;

/// 置信度基准值与上限
const BASE_CONFIDENCE: f64 = 0.5;
const MAX_CONFIDENCE: f64 = 0.99;
/// 有非零得分但归一化后置信度偏低时使用的值
const BOOSTED_CONFIDENCE: f64 = 0.6;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("text to analyze is empty")]
    InvalidInput,
    #[error("text scorer failed: {0}")]
    Dependency(String),
}

/// 词典打分器对一段文本的原始结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexicalAnalysis {
    /// 命中词分值之和
    pub score: i32,
    /// 按词数归一化后的得分
    pub comparative: f64,
    /// 正向命中词，按扫描顺序
    pub positive: Vec<String>,
    /// 负向命中词，按扫描顺序
    pub negative: Vec<String>,
}

/// 文本打分能力，具体词典实现可替换
pub trait TextScorer: Send + Sync {
    fn analyze(&self, text: &str) -> Result<LexicalAnalysis, ScoreError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreOutcome {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub keywords: Vec<String>,
}

/// 得分符号决定情感标签，恰好为 0 时为中性
pub fn label_for(score: i32) -> Sentiment {
    match score {
        s if s > 0 => Sentiment::Positive,
        s if s < 0 => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}

/// 启发式置信度：先截断上限，再对非零得分做兜底提升
pub fn confidence_for(score: i32, comparative: f64) -> f64 {
    let mut confidence = BASE_CONFIDENCE + comparative.abs() / 5.0;
    if confidence > MAX_CONFIDENCE {
        confidence = MAX_CONFIDENCE;
    }
    if confidence < BASE_CONFIDENCE && score != 0 {
        confidence = BOOSTED_CONFIDENCE;
    }
    confidence
}

#[derive(Clone)]
pub struct SentimentScorer {
    inner: Arc<dyn TextScorer>,
}

impl SentimentScorer {
    pub fn new(inner: Arc<dyn TextScorer>) -> Self {
        Self { inner }
    }

    pub fn score(&self, text: Option<&str>) -> Result<ScoreOutcome, ScoreError> {
        let text = match text {
            Some(text) if !text.is_empty() => text,
            _ => return Err(ScoreError::InvalidInput),
        };

        let analysis = self.inner.analyze(text)?;
        if !analysis.comparative.is_finite() {
            return Err(ScoreError::Dependency(format!(
                "comparative score is not finite: {}",
                analysis.comparative
            )));
        }

        let LexicalAnalysis {
            score,
            comparative,
            positive,
            mut negative,
        } = analysis;

        let mut keywords = positive;
        keywords.append(&mut negative);

        Ok(ScoreOutcome {
            sentiment: label_for(score),
            confidence: confidence_for(score, comparative),
            keywords,
        })
    }
}

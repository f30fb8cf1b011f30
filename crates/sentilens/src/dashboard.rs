use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use sentilens_entity::analysis::{self, Sentiment};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::DEFAULT_PLATFORM;
use crate::store::AnalysisRepository;
use crate::utils::time_format::time_ago;

/// 尚未统计的指标占位值
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SentimentBreakdown {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_posts: u64,
    pub overall_sentiment: SentimentBreakdown,
    /// 互动量，暂未统计
    pub engagement: String,
    /// 趋势，暂未计算
    pub trend: String,
}

/// 最近动态中的一条
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ActivityItem {
    pub id: i32,
    pub text: String,
    pub platform: String,
    #[schema(value_type = String)]
    pub sentiment: Sentiment,
    /// 相对时间，如 "3 days ago"
    #[serde(rename = "date")]
    pub relative_age: String,
}

/// 各标签独立四舍五入，三者之和不保证为 100
pub fn percentage(count: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}

pub fn build_summary(total: u64, positive: u64, neutral: u64, negative: u64) -> DashboardSummary {
    DashboardSummary {
        total_posts: total,
        overall_sentiment: SentimentBreakdown {
            positive: percentage(positive, total),
            neutral: percentage(neutral, total),
            negative: percentage(negative, total),
        },
        engagement: NOT_AVAILABLE.to_string(),
        trend: NOT_AVAILABLE.to_string(),
    }
}

pub async fn summary(repository: &dyn AnalysisRepository) -> Result<DashboardSummary, DbErr> {
    let total = repository.count(None).await?;
    let positive = repository.count(Some(Sentiment::Positive)).await?;
    let neutral = repository.count(Some(Sentiment::Neutral)).await?;
    let negative = repository.count(Some(Sentiment::Negative)).await?;

    Ok(build_summary(total, positive, neutral, negative))
}

fn to_activity(record: analysis::Model, now: DateTime<Utc>) -> ActivityItem {
    let platform = if record.platform.is_empty() {
        DEFAULT_PLATFORM.to_string()
    } else {
        record.platform
    };

    ActivityItem {
        id: record.id,
        text: record.text,
        platform,
        sentiment: record.sentiment,
        relative_age: time_ago(record.created_at, now),
    }
}

pub async fn recent_activity(
    repository: &dyn AnalysisRepository,
    limit: u64,
    now: DateTime<Utc>,
) -> Result<Vec<ActivityItem>, DbErr> {
    let records = repository.recent(limit).await?;
    Ok(records.into_iter().map(|record| to_activity(record, now)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::{memory_repository, new_analysis};
    use chrono::Duration;

    #[test]
    fn test_percentages_are_rounded_independently() {
        let summary = build_summary(3, 2, 0, 1);
        assert_eq!(
            summary.overall_sentiment,
            SentimentBreakdown {
                positive: 67,
                neutral: 0,
                negative: 33
            }
        );

        // 三个标签各占 1/3，四舍五入后总和为 99
        let thirds = build_summary(3, 1, 1, 1).overall_sentiment;
        assert_eq!(thirds.positive + thirds.neutral + thirds.negative, 99);

        assert_eq!(percentage(1, 8), 13);
    }

    #[test]
    fn test_summary_wire_format() {
        let value = serde_json::to_value(build_summary(0, 0, 0, 0)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "totalPosts": 0,
                "overallSentiment": {"positive": 0, "neutral": 0, "negative": 0},
                "engagement": "N/A",
                "trend": "N/A"
            })
        );
    }

    #[tokio::test]
    async fn test_summary_empty_store() {
        let repo = memory_repository().await;
        let summary = summary(&repo).await.unwrap();
        assert_eq!(summary.total_posts, 0);
        assert_eq!(summary.overall_sentiment, SentimentBreakdown { positive: 0, neutral: 0, negative: 0 });
    }

    #[tokio::test]
    async fn test_summary_counts_labels() {
        let repo = memory_repository().await;
        let now = Utc::now();
        for sentiment in [Sentiment::Positive, Sentiment::Positive, Sentiment::Negative] {
            repo.insert(new_analysis("x", sentiment, now)).await.unwrap();
        }

        let summary = summary(&repo).await.unwrap();
        assert_eq!(summary.total_posts, 3);
        assert_eq!(summary.overall_sentiment.positive, 67);
        assert_eq!(summary.overall_sentiment.neutral, 0);
        assert_eq!(summary.overall_sentiment.negative, 33);
    }

    #[tokio::test]
    async fn test_recent_activity_bounded_and_sorted() {
        let repo = memory_repository().await;
        let now = Utc::now();
        for (text, age) in [
            ("week", Duration::days(7)),
            ("hour", Duration::seconds(3661)),
            ("fresh", Duration::seconds(5)),
            ("old", Duration::days(400)),
        ] {
            repo.insert(new_analysis(text, Sentiment::Neutral, now - age)).await.unwrap();
        }

        let feed = recent_activity(&repo, 3, now).await.unwrap();
        assert_eq!(feed.len(), 3);
        let texts = feed.iter().map(|i| i.text.as_str()).collect::<Vec<_>>();
        assert_eq!(texts, vec!["fresh", "hour", "week"]);
        assert_eq!(feed[0].relative_age, "5 seconds ago");
        assert_eq!(feed[1].relative_age, "1 hours ago");
        assert_eq!(feed[2].relative_age, "7 days ago");

        let all = recent_activity(&repo, 10, now).await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[3].relative_age, "1 years ago");
    }

    #[tokio::test]
    async fn test_recent_activity_defaults_empty_platform() {
        let repo = memory_repository().await;
        let mut record = new_analysis("x", Sentiment::Positive, Utc::now());
        record.platform = String::new();
        repo.insert(record).await.unwrap();

        let feed = recent_activity(&repo, 10, Utc::now()).await.unwrap();
        assert_eq!(feed[0].platform, "Web");

        let value = serde_json::to_value(&feed[0]).unwrap();
        assert!(value.get("date").is_some());
        assert_eq!(value["sentiment"], "Positive");
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use sentilens_entity::analysis::{self, Sentiment};
use sentilens_entity::prelude::Analysis;

/// 待写入的分析记录
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub text: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub keywords: Vec<String>,
    pub platform: String,
    pub created_at: DateTime<Utc>,
}

/// 分析记录存储，只支持追加与读取
#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    async fn insert(&self, record: NewAnalysis) -> Result<analysis::Model, DbErr>;

    /// 按创建时间倒序取最近的记录
    async fn recent(&self, limit: u64) -> Result<Vec<analysis::Model>, DbErr>;

    /// 统计记录数，`sentiment` 为空时统计全部
    async fn count(&self, sentiment: Option<Sentiment>) -> Result<u64, DbErr>;
}

#[derive(Clone)]
pub struct SqliteAnalysisRepository {
    db: DatabaseConnection,
}

impl SqliteAnalysisRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AnalysisRepository for SqliteAnalysisRepository {
    async fn insert(&self, record: NewAnalysis) -> Result<analysis::Model, DbErr> {
        analysis::ActiveModel {
            id: NotSet,
            text: Set(record.text),
            sentiment: Set(record.sentiment),
            confidence: Set(record.confidence),
            keywords: Set(record.keywords.into()),
            platform: Set(record.platform),
            created_at: Set(record.created_at),
        }
        .insert(&self.db)
        .await
    }

    async fn recent(&self, limit: u64) -> Result<Vec<analysis::Model>, DbErr> {
        Analysis::find()
            .order_by_desc(analysis::Column::CreatedAt)
            .order_by_desc(analysis::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
    }

    async fn count(&self, sentiment: Option<Sentiment>) -> Result<u64, DbErr> {
        let mut query = Analysis::find();
        if let Some(sentiment) = sentiment {
            query = query.filter(analysis::Column::Sentiment.eq(sentiment));
        }
        query.count(&self.db).await
    }
}

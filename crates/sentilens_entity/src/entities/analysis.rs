use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 情感分析记录实体，创建后不再修改
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "analysis")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub sentiment: Sentiment,
    #[sea_orm(column_type = "Double")]
    pub confidence: f64,
    pub keywords: Keywords,
    pub platform: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// 情感标签，数据库中以字符串保存
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Sentiment {
    #[sea_orm(string_value = "Positive")]
    Positive,
    #[sea_orm(string_value = "Negative")]
    Negative,
    #[sea_orm(string_value = "Neutral")]
    Neutral,
}

/// 命中的词典关键词（先正面后负面），以 JSON 数组保存
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sea_orm::FromJsonQueryResult)]
#[serde(transparent)]
pub struct Keywords(pub Vec<String>);

impl From<Vec<String>> for Keywords {
    fn from(words: Vec<String>) -> Self {
        Self(words)
    }
}

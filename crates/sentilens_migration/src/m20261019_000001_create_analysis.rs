use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建情感分析记录表（只追加，不更新）
        manager
            .create_table(
                Table::create()
                    .table(Analysis::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Analysis::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Analysis::Text).text().not_null())
                    .col(ColumnDef::new(Analysis::Sentiment).string().not_null())
                    .col(ColumnDef::new(Analysis::Confidence).double().not_null())
                    .col(ColumnDef::new(Analysis::Keywords).json().not_null().default("[]"))
                    .col(ColumnDef::new(Analysis::Platform).string().not_null().default("Web"))
                    .col(
                        ColumnDef::new(Analysis::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Analysis::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Analysis {
    Table,
    Id,
    Text,
    Sentiment,
    Confidence,
    Keywords,
    Platform,
    CreatedAt,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 仪表盘与历史列表都按创建时间倒序读取
        manager
            .create_index(
                Index::create()
                    .name("idx_analysis_created_at")
                    .table(Analysis::Table)
                    .col(Analysis::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // 汇总统计按情感标签计数
        manager
            .create_index(
                Index::create()
                    .name("idx_analysis_sentiment")
                    .table(Analysis::Table)
                    .col(Analysis::Sentiment)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_analysis_sentiment").table(Analysis::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_analysis_created_at").table(Analysis::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Analysis {
    Table,
    Sentiment,
    CreatedAt,
}

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sea_orm::{DatabaseConnection, SqlxSqliteConnector};
use sentilens_migration::{Migrator, MigratorTrait};
use tracing::{debug, info};

use crate::config::Config;

/// 创建 SQLite 连接选项，优先使用显式的连接串
fn create_sqlite_options(config: &Config) -> Result<SqliteConnectOptions> {
    let options = match config.database_url.as_deref() {
        Some(url) => SqliteConnectOptions::from_str(url).with_context(|| format!("无效的数据库连接串: {}", url))?,
        None => {
            // 确保配置目录存在
            if !config.config_dir.exists() {
                std::fs::create_dir_all(&config.config_dir)
                    .with_context(|| format!("创建配置目录失败: {}", config.config_dir.display()))?;
            }
            SqliteConnectOptions::new().filename(config.database_path())
        }
    };

    Ok(options
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(30))
        .pragma("cache_size", "-16384")
        .pragma("temp_store", "MEMORY"))
}

async fn migrate_database(options: SqliteConnectOptions) -> Result<()> {
    // 为迁移创建单连接池（避免多连接导致的迁移顺序问题）
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .context("连接数据库失败")?;

    let connection = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool.clone());
    Migrator::up(&connection, None).await.context("数据库迁移失败")?;

    // 显式关闭连接池，确保释放所有数据库锁
    pool.close().await;
    debug!("迁移完成，已关闭迁移连接池");

    Ok(())
}

async fn database_connection(options: SqliteConnectOptions) -> Result<DatabaseConnection> {
    let pool = SqlitePoolOptions::new()
        .max_connections(16)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(3600))
        .connect_with(options)
        .await
        .context("创建数据库连接池失败")?;

    debug!("SQLite 连接池已创建，WAL 模式，busy_timeout = 30s");

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// 进行数据库迁移并获取数据库连接，供外部使用
pub async fn setup_database(config: &Config) -> Result<DatabaseConnection> {
    let options = create_sqlite_options(config)?;
    migrate_database(options.clone()).await?;
    let connection = database_connection(options).await?;

    match config.database_url.as_deref() {
        Some(url) => info!("数据库已就绪: {}", url),
        None => info!("数据库已就绪: {}", config.database_path().display()),
    }

    Ok(connection)
}

/// 测试用内存数据库：单连接且不过期，否则连接回收后数据随之丢失
#[cfg(test)]
pub(crate) async fn setup_memory_database() -> DatabaseConnection {
    let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    let connection = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
    Migrator::up(&connection, None).await.unwrap();
    connection
}

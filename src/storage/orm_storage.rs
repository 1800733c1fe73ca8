//! SeaORM 存储实现
//!
//! 负责连接、性能参数和迁移；查询与写入由 `db::repositories` 完成

use crate::error::{Result, TemplateError};
use crate::migration::Migrator;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use sqlx::SqlitePool;
use tracing::{info, warn};

/// 迁移完成后必须存在的表
const EXPECTED_TABLES: [&str; 5] = [
    "groups",
    "users",
    "permission_templates",
    "perm_templates_groups",
    "perm_templates_users",
];

/// SeaORM 存储实现
#[derive(Debug)]
pub struct Storage {
    /// 数据库连接
    pub db: DatabaseConnection,
}

impl Storage {
    /// 创建新的 ORM 存储实例
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        info!("Initializing SeaORM storage instance, database url: {}", database_url);

        if !database_url.starts_with("sqlite:") {
            return Err(TemplateError::ConfigError(format!(
                "Only SQLite databases are supported, got: {}",
                database_url
            )));
        }

        // 内存数据库每个连接都是独立的库，只能使用单连接
        let max_connections = if database_url.contains(":memory:") {
            1
        } else {
            max_connections.max(1)
        };

        let mut options = ConnectOptions::new(database_url.to_string());
        options.max_connections(max_connections).sqlx_logging(false);

        let db = Database::connect(options).await.map_err(|e| {
            TemplateError::DatabaseConnectionError(format!("Failed to connect to database: {}", e))
        })?;

        Self::apply_performance_settings(&db).await;

        Ok(Self { db })
    }

    /// 打开内存数据库并执行迁移
    pub async fn in_memory() -> Result<Self> {
        let storage = Self::new("sqlite::memory:", 1).await?;
        storage.migrate().await?;
        Ok(storage)
    }

    /// 应用性能优化设置
    async fn apply_performance_settings(db: &DatabaseConnection) {
        let settings = [
            "PRAGMA journal_mode = WAL",
            "PRAGMA synchronous = NORMAL",
            "PRAGMA temp_store = memory",
            "PRAGMA busy_timeout = 30000",
            "PRAGMA foreign_keys = true",
        ];

        for setting in settings {
            if let Err(e) = db
                .execute(Statement::from_string(
                    sea_orm::DatabaseBackend::Sqlite,
                    setting.to_string(),
                ))
                .await
            {
                warn!("Failed to apply database setting {}: {}", setting, e);
            }
        }
    }

    /// 执行全部未应用的迁移
    pub async fn migrate(&self) -> Result<()> {
        Migrator::up(&self.db, None).await.map_err(|e| {
            TemplateError::DatabaseMigrationError(format!("Failed to run SeaORM migrations: {}", e))
        })?;
        info!("SeaORM migrations completed successfully");
        Ok(())
    }

    /// 检查迁移后的表结构是否完整
    pub async fn verify_schema(&self) -> Result<()> {
        for table_name in EXPECTED_TABLES {
            let row = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(table_name)
                .fetch_optional(self.pool())
                .await?;

            if row.is_none() {
                return Err(TemplateError::DatabaseMigrationError(format!(
                    "Required table '{}' does not exist",
                    table_name
                )));
            }
        }

        info!("Database schema verification passed");
        Ok(())
    }

    /// SeaORM 持有的 SQLite 连接池，供手写 SQL 查询使用
    pub fn pool(&self) -> &SqlitePool {
        self.db.get_sqlite_connection_pool()
    }
}

// SQLite storage initialization utilities

use crate::config::{database_url, AppConfig};
use crate::error::Result;
use crate::storage::Storage;
use std::path::Path;
use std::sync::Arc;

/// 按配置打开数据库并执行迁移
pub async fn init_storage(config: &AppConfig, config_dir: &Path) -> Result<Arc<Storage>> {
    let db_path = config.database_path(config_dir);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let storage = Storage::new(&database_url(&db_path), config.database.max_connections).await?;
    storage.migrate().await?;
    storage.verify_schema().await?;

    Ok(Arc::new(storage))
}

#[derive(thiserror::Error, Debug)]
pub enum TemplateError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFoundError(String),

    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    #[error("Database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("Database query failed: {0}")]
    DatabaseQueryError(String),

    #[error("Database transaction failed: {0}")]
    DatabaseTransactionError(String),

    #[error("Database migration failed: {0}")]
    DatabaseMigrationError(String),
}

// Convert SQLx errors to specific database errors
impl From<sqlx::Error> for TemplateError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                TemplateError::DatabaseQueryError(format!("Database error: {}", db_err.message()))
            }
            sqlx::Error::PoolTimedOut => TemplateError::DatabaseConnectionError(
                "Database connection pool timeout".to_string(),
            ),
            sqlx::Error::PoolClosed => TemplateError::DatabaseConnectionError(
                "Database connection pool closed".to_string(),
            ),
            sqlx::Error::RowNotFound => TemplateError::NotFoundError("Record not found".to_string()),
            sqlx::Error::ColumnDecode { .. } => {
                TemplateError::DatabaseQueryError(format!("Column decode error: {}", err))
            }
            _ => TemplateError::DatabaseQueryError(format!("Database error: {}", err)),
        }
    }
}

// SeaORM wraps the same driver errors, UNIQUE violations become AlreadyExists
impl From<sea_orm::DbErr> for TemplateError {
    fn from(err: sea_orm::DbErr) -> Self {
        let message = err.to_string();
        match err {
            sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_) => {
                TemplateError::DatabaseConnectionError(message)
            }
            sea_orm::DbErr::RecordNotFound(_) => TemplateError::NotFoundError(message),
            sea_orm::DbErr::Migration(_) => TemplateError::DatabaseMigrationError(message),
            _ if message.contains("UNIQUE constraint failed") => {
                TemplateError::AlreadyExists(message)
            }
            _ => TemplateError::DatabaseQueryError(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;

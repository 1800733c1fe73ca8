pub mod repositories;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::error::TemplateError;
use sea_orm::DbErr;

/// 写入失败时将 UNIQUE 约束冲突转换为 AlreadyExists
pub(crate) fn map_insert_error(err: DbErr, what: impl FnOnce() -> String) -> TemplateError {
    if err.to_string().contains("UNIQUE constraint failed") {
        TemplateError::AlreadyExists(what())
    } else {
        err.into()
    }
}

use crate::db::map_insert_error;
use crate::entities::{prelude::*, user};
use crate::error::{Result, TemplateError};
use crate::storage::Storage;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use tracing::info;

/// 用户数据仓库
pub struct UserRepository {
    storage: Arc<Storage>,
}

impl UserRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub async fn insert(&self, login: &str, name: &str) -> Result<user::Model> {
        let login = login.trim();
        if login.is_empty() {
            return Err(TemplateError::ValidationError(
                "User login cannot be empty".to_string(),
            ));
        }

        let model = user::ActiveModel {
            login: Set(login.to_string()),
            name: Set(name.trim().to_string()),
            active: Set(true),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let result = model
            .insert(&self.storage.db)
            .await
            .map_err(|e| map_insert_error(e, || format!("User '{}' already exists", login)))?;

        info!("Created user: {} (id {})", result.login, result.id);
        Ok(result)
    }

    pub async fn select_by_login(&self, login: &str) -> Result<Option<user::Model>> {
        let user = User::find()
            .filter(UserColumn::Login.eq(login))
            .one(&self.storage.db)
            .await?;
        Ok(user)
    }

    /// 停用用户，停用后不再出现在模板查询中
    pub async fn deactivate(&self, login: &str) -> Result<()> {
        let user = self
            .select_by_login(login)
            .await?
            .ok_or_else(|| TemplateError::NotFoundError(format!("User '{}' not found", login)))?;

        let mut active_user: user::ActiveModel = user.into();
        active_user.active = Set(false);
        active_user.update(&self.storage.db).await?;

        info!("Deactivated user: {}", login);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_select_and_deactivate() {
        let repo = UserRepository::new(Arc::new(Storage::in_memory().await.unwrap()));

        let created = repo.insert("marius", "Marius").await.unwrap();
        assert!(created.active);

        let err = repo.insert("marius", "Other").await.unwrap_err();
        assert!(matches!(err, TemplateError::AlreadyExists(_)));

        repo.deactivate("marius").await.unwrap();
        let found = repo.select_by_login("marius").await.unwrap().unwrap();
        assert!(!found.active);

        let err = repo.deactivate("missing").await.unwrap_err();
        assert!(matches!(err, TemplateError::NotFoundError(_)));
    }
}

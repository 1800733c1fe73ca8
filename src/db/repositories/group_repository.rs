use crate::db::map_insert_error;
use crate::entities::{group, prelude::*};
use crate::error::{Result, TemplateError};
use crate::permission::GroupRef;
use crate::storage::Storage;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use std::sync::Arc;
use tracing::{debug, info};

/// 用户组数据仓库
pub struct GroupRepository {
    storage: Arc<Storage>,
}

impl GroupRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// 创建用户组，"Anyone" 是保留名称
    pub async fn insert(&self, name: &str, description: Option<String>) -> Result<group::Model> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TemplateError::ValidationError(
                "Group name cannot be empty".to_string(),
            ));
        }
        if GroupRef::is_reserved_name(name) {
            return Err(TemplateError::ValidationError(format!(
                "Group name '{}' is reserved",
                name
            )));
        }

        let model = group::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let result = model
            .insert(&self.storage.db)
            .await
            .map_err(|e| map_insert_error(e, || format!("Group '{}' already exists", name)))?;

        info!("Created group: {} (id {})", result.name, result.id);
        Ok(result)
    }

    pub async fn select_by_name(&self, name: &str) -> Result<Option<group::Model>> {
        let group = Group::find()
            .filter(GroupColumn::Name.eq(name))
            .one(&self.storage.db)
            .await?;
        Ok(group)
    }

    pub async fn select_all(&self) -> Result<Vec<group::Model>> {
        let groups = Group::find()
            .order_by_asc(GroupColumn::Name)
            .all(&self.storage.db)
            .await?;
        Ok(groups)
    }

    /// 按名称解析为 [`GroupRef`]，"Anyone"（不区分大小写）解析为哨兵
    pub async fn resolve(&self, name: &str) -> Result<GroupRef> {
        if GroupRef::is_reserved_name(name) {
            return Ok(GroupRef::Anyone);
        }

        debug!("Resolving group by name: {}", name);
        let group = self
            .select_by_name(name.trim())
            .await?
            .ok_or_else(|| TemplateError::NotFoundError(format!("Group '{}' not found", name)))?;

        Ok(GroupRef::Named {
            id: group.id,
            name: group.name,
        })
    }
}

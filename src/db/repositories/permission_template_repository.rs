use crate::db::map_insert_error;
use crate::entities::{perm_template_group, perm_template_user, permission_template, prelude::*};
use crate::error::{Result, TemplateError};
use crate::permission::{
    assemble_groups, assemble_users, GroupRef, GroupWithPermission, UserWithPermission,
    WithPermissionQuery,
};
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use sqlx::Row;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info};

/// 所有真实的组，附带其在模板上对指定权限的授权（没有授权时为 NULL）
const SELECT_GROUPS_SQL: &str = r#"
    SELECT g.id AS id, g.name AS name, ptg.permission_reference AS permission
    FROM "groups" g
    LEFT JOIN perm_templates_groups ptg
        ON ptg.group_id = g.id
        AND ptg.template_id = ?
        AND ptg.permission_reference = ?
"#;

/// Anyone 的授权以 group_id IS NULL 存储
const SELECT_ANYONE_SQL: &str = r#"
    SELECT ptg.permission_reference AS permission
    FROM perm_templates_groups ptg
    WHERE ptg.group_id IS NULL
        AND ptg.template_id = ?
        AND ptg.permission_reference = ?
    LIMIT 1
"#;

const SELECT_USERS_SQL: &str = r#"
    SELECT u.login AS login, u.name AS name, ptu.permission_reference AS permission
    FROM users u
    LEFT JOIN perm_templates_users ptu
        ON ptu.user_id = u.id
        AND ptu.template_id = ?
        AND ptu.permission_reference = ?
    WHERE u.active = 1
"#;

static KEE_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[^a-z0-9]+").expect("static regex is valid")
});

/// 新建或更新模板时的输入
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPermissionTemplate {
    pub name: String,
    pub description: Option<String>,
    pub key_pattern: Option<String>,
}

impl NewPermissionTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_key_pattern(mut self, key_pattern: impl Into<String>) -> Self {
        self.key_pattern = Some(key_pattern.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TemplateError::ValidationError(
                "Permission template name cannot be empty".to_string(),
            ));
        }
        if let Some(ref pattern) = self.key_pattern {
            Regex::new(pattern).map_err(|e| {
                TemplateError::ValidationError(format!("Invalid key pattern '{}': {}", pattern, e))
            })?;
        }
        Ok(())
    }
}

/// 名称中没有 ASCII 字母或数字时使用的 key 前缀
const FALLBACK_KEE_STEM: &str = "template";

/// 由模板名称和创建时间生成唯一 key，例如 "Default template" -> "default_template_1356998400000"
pub fn generate_template_key(name: &str, now: DateTime<Utc>) -> String {
    let lowercase = name.trim().to_lowercase();
    let slug = KEE_SEPARATORS.replace_all(&lowercase, "_");
    let stem = match slug.trim_matches('_') {
        "" => FALLBACK_KEE_STEM,
        stem => stem,
    };
    format!("{}_{}", stem, now.timestamp_millis())
}

/// 项目 key 是否匹配模板的 key_pattern，未设置时不匹配
pub fn matches_project_key(template: &permission_template::Model, project_key: &str) -> Result<bool> {
    match template.key_pattern {
        None => Ok(false),
        Some(ref pattern) => {
            let regex = Regex::new(pattern).map_err(|e| {
                TemplateError::ValidationError(format!("Invalid key pattern '{}': {}", pattern, e))
            })?;
            Ok(regex.is_match(project_key))
        }
    }
}

fn validate_permission(permission: &str) -> Result<&str> {
    let permission = permission.trim();
    if permission.is_empty() {
        return Err(TemplateError::ValidationError(
            "Permission cannot be empty".to_string(),
        ));
    }
    Ok(permission)
}

fn group_assignment(template_id: i64, group: &GroupRef, permission: &str) -> Condition {
    let group_condition = match group.id() {
        Some(group_id) => PermTemplateGroupColumn::GroupId.eq(group_id),
        None => PermTemplateGroupColumn::GroupId.is_null(),
    };

    Condition::all()
        .add(PermTemplateGroupColumn::TemplateId.eq(template_id))
        .add(PermTemplateGroupColumn::PermissionReference.eq(permission))
        .add(group_condition)
}

fn user_assignment(template_id: i64, user_id: i64, permission: &str) -> Condition {
    Condition::all()
        .add(PermTemplateUserColumn::TemplateId.eq(template_id))
        .add(PermTemplateUserColumn::UserId.eq(user_id))
        .add(PermTemplateUserColumn::PermissionReference.eq(permission))
}

/// 权限模板数据仓库
pub struct PermissionTemplateRepository {
    storage: Arc<Storage>,
}

impl PermissionTemplateRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    // ============================================================================
    // 模板授权查询
    // ============================================================================

    /// 查询可用于模板的组，以及每个组是否持有 `query.permission()`
    ///
    /// 未持有权限的 Anyone 不会返回；结果按组名排序
    pub async fn select_groups(
        &self,
        query: &WithPermissionQuery,
        template_id: i64,
    ) -> Result<Vec<GroupWithPermission>> {
        debug!(
            "Selecting groups of template {} for permission '{}' (search: {:?}, membership: {})",
            template_id,
            query.permission(),
            query.search(),
            query.membership()
        );

        let pool = self.storage.pool();

        let named_rows = sqlx::query(SELECT_GROUPS_SQL)
            .bind(template_id)
            .bind(query.permission())
            .fetch_all(pool)
            .await?;

        let mut rows = Vec::with_capacity(named_rows.len() + 1);
        for row in named_rows {
            rows.push(GroupWithPermission {
                group: GroupRef::Named {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                },
                permission: row.try_get("permission")?,
            });
        }

        let anyone_row = sqlx::query(SELECT_ANYONE_SQL)
            .bind(template_id)
            .bind(query.permission())
            .fetch_optional(pool)
            .await?;

        rows.push(GroupWithPermission {
            group: GroupRef::Anyone,
            permission: match anyone_row {
                Some(row) => Some(row.try_get("permission")?),
                None => None,
            },
        });

        let groups = assemble_groups(rows, query);
        debug!("Selected {} groups of template {}", groups.len(), template_id);
        Ok(groups)
    }

    /// 查询启用状态的用户以及每个用户是否持有 `query.permission()`
    pub async fn select_users(
        &self,
        query: &WithPermissionQuery,
        template_id: i64,
    ) -> Result<Vec<UserWithPermission>> {
        debug!(
            "Selecting users of template {} for permission '{}' (search: {:?}, membership: {})",
            template_id,
            query.permission(),
            query.search(),
            query.membership()
        );

        let rows = sqlx::query(SELECT_USERS_SQL)
            .bind(template_id)
            .bind(query.permission())
            .fetch_all(self.storage.pool())
            .await?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            users.push(UserWithPermission {
                login: row.try_get("login")?,
                name: row.try_get("name")?,
                permission: row.try_get("permission")?,
            });
        }

        let users = assemble_users(users, query);
        debug!("Selected {} users of template {}", users.len(), template_id);
        Ok(users)
    }

    // ============================================================================
    // 模板管理
    // ============================================================================

    pub async fn create_template(
        &self,
        template: NewPermissionTemplate,
    ) -> Result<permission_template::Model> {
        template.validate()?;

        let name = template.name.trim().to_string();
        let now = Utc::now();
        let model = permission_template::ActiveModel {
            name: Set(name.clone()),
            kee: Set(generate_template_key(&name, now)),
            description: Set(template.description),
            key_pattern: Set(template.key_pattern),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let result = model.insert(&self.storage.db).await.map_err(|e| {
            map_insert_error(e, || format!("Permission template '{}' already exists", name))
        })?;

        info!("Created permission template: {} ({})", result.name, result.kee);
        Ok(result)
    }

    pub async fn select_template(&self, template_id: i64) -> Result<Option<permission_template::Model>> {
        let template = PermissionTemplate::find_by_id(template_id)
            .one(&self.storage.db)
            .await?;
        Ok(template)
    }

    pub async fn select_template_by_key(&self, kee: &str) -> Result<Option<permission_template::Model>> {
        let template = PermissionTemplate::find()
            .filter(PermissionTemplateColumn::Kee.eq(kee))
            .one(&self.storage.db)
            .await?;
        Ok(template)
    }

    pub async fn select_all_templates(&self) -> Result<Vec<permission_template::Model>> {
        let templates = PermissionTemplate::find()
            .order_by_asc(PermissionTemplateColumn::Name)
            .all(&self.storage.db)
            .await?;
        Ok(templates)
    }

    async fn require_template(&self, template_id: i64) -> Result<permission_template::Model> {
        self.select_template(template_id).await?.ok_or_else(|| {
            TemplateError::NotFoundError(format!("Permission template {} not found", template_id))
        })
    }

    /// 更新名称、描述和 key_pattern，key 保持不变
    pub async fn update_template(
        &self,
        template_id: i64,
        template: NewPermissionTemplate,
    ) -> Result<permission_template::Model> {
        template.validate()?;

        let existing = self.require_template(template_id).await?;
        let name = template.name.trim().to_string();

        let mut active_template: permission_template::ActiveModel = existing.into();
        active_template.name = Set(name.clone());
        active_template.description = Set(template.description);
        active_template.key_pattern = Set(template.key_pattern);
        active_template.updated_at = Set(Utc::now().into());

        let result = active_template.update(&self.storage.db).await.map_err(|e| {
            map_insert_error(e, || format!("Permission template '{}' already exists", name))
        })?;

        info!("Updated permission template: {}", template_id);
        Ok(result)
    }

    /// 删除模板及其全部组、用户授权
    pub async fn delete_template(&self, template_id: i64) -> Result<()> {
        let txn = self.storage.db.begin().await.map_err(|e| {
            TemplateError::DatabaseTransactionError(format!("Failed to begin transaction: {}", e))
        })?;

        PermissionTemplate::find_by_id(template_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                TemplateError::NotFoundError(format!("Permission template {} not found", template_id))
            })?;

        let groups = PermTemplateGroup::delete_many()
            .filter(PermTemplateGroupColumn::TemplateId.eq(template_id))
            .exec(&txn)
            .await?;

        let users = PermTemplateUser::delete_many()
            .filter(PermTemplateUserColumn::TemplateId.eq(template_id))
            .exec(&txn)
            .await?;

        PermissionTemplate::delete_by_id(template_id).exec(&txn).await?;

        txn.commit().await.map_err(|e| {
            TemplateError::DatabaseTransactionError(format!("Failed to commit transaction: {}", e))
        })?;

        info!(
            "Deleted permission template {} ({} group and {} user permissions)",
            template_id, groups.rows_affected, users.rows_affected
        );
        Ok(())
    }

    // ============================================================================
    // 模板授权管理
    // ============================================================================

    /// 授予组（或 Anyone）模板权限，已存在时不做处理
    pub async fn add_group_permission(
        &self,
        template_id: i64,
        group: &GroupRef,
        permission: &str,
    ) -> Result<()> {
        let permission = validate_permission(permission)?;
        self.require_template(template_id).await?;

        let existing = PermTemplateGroup::find()
            .filter(group_assignment(template_id, group, permission))
            .one(&self.storage.db)
            .await?;
        if existing.is_some() {
            debug!(
                "Group permission already exists: {} -> {} on template {}",
                group.name(),
                permission,
                template_id
            );
            return Ok(());
        }

        let model = perm_template_group::ActiveModel {
            group_id: Set(group.id()),
            template_id: Set(template_id),
            permission_reference: Set(permission.to_string()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        model.insert(&self.storage.db).await?;

        info!(
            "Added group permission: {} -> {} on template {}",
            group.name(),
            permission,
            template_id
        );
        Ok(())
    }

    /// 撤销组（或 Anyone）模板权限，返回删除的行数
    pub async fn remove_group_permission(
        &self,
        template_id: i64,
        group: &GroupRef,
        permission: &str,
    ) -> Result<u64> {
        let permission = validate_permission(permission)?;

        let result = PermTemplateGroup::delete_many()
            .filter(group_assignment(template_id, group, permission))
            .exec(&self.storage.db)
            .await?;

        info!(
            "Removed group permission: {} -> {} on template {} ({} rows)",
            group.name(),
            permission,
            template_id,
            result.rows_affected
        );
        Ok(result.rows_affected)
    }

    pub async fn add_user_permission(
        &self,
        template_id: i64,
        user_id: i64,
        permission: &str,
    ) -> Result<()> {
        let permission = validate_permission(permission)?;
        self.require_template(template_id).await?;

        let existing = PermTemplateUser::find()
            .filter(user_assignment(template_id, user_id, permission))
            .one(&self.storage.db)
            .await?;
        if existing.is_some() {
            debug!(
                "User permission already exists: {} -> {} on template {}",
                user_id, permission, template_id
            );
            return Ok(());
        }

        let model = perm_template_user::ActiveModel {
            user_id: Set(user_id),
            template_id: Set(template_id),
            permission_reference: Set(permission.to_string()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        model.insert(&self.storage.db).await?;

        info!(
            "Added user permission: {} -> {} on template {}",
            user_id, permission, template_id
        );
        Ok(())
    }

    pub async fn remove_user_permission(
        &self,
        template_id: i64,
        user_id: i64,
        permission: &str,
    ) -> Result<u64> {
        let permission = validate_permission(permission)?;

        let result = PermTemplateUser::delete_many()
            .filter(user_assignment(template_id, user_id, permission))
            .exec(&self.storage.db)
            .await?;

        info!(
            "Removed user permission: {} -> {} on template {} ({} rows)",
            user_id, permission, template_id, result.rows_affected
        );
        Ok(result.rows_affected)
    }
}

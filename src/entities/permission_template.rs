use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 权限模板实体
///
/// 对应数据库表 permission_templates
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "permission_templates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// 模板名称（唯一约束）
    #[sea_orm(unique)]
    pub name: String,

    /// 生成的模板 key（唯一约束）
    #[sea_orm(unique)]
    pub kee: String,

    pub description: Option<String>,

    /// 匹配项目 key 的正则表达式
    pub key_pattern: Option<String>,

    #[sea_orm(column_type = "TimestampWithTimeZone")]
    pub created_at: ChronoDateTimeWithTimeZone,

    #[sea_orm(column_type = "TimestampWithTimeZone")]
    pub updated_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::perm_template_group::Entity")]
    PermTemplateGroups,
    #[sea_orm(has_many = "super::perm_template_user::Entity")]
    PermTemplateUsers,
}

impl Related<super::perm_template_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PermTemplateGroups.def()
    }
}

impl Related<super::perm_template_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PermTemplateUsers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

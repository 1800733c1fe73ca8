use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 模板-用户授权实体
///
/// 对应数据库表 perm_templates_users
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "perm_templates_users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub user_id: i64,

    pub template_id: i64,

    pub permission_reference: String,

    #[sea_orm(column_type = "TimestampWithTimeZone")]
    pub created_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::permission_template::Entity",
        from = "Column::TemplateId",
        to = "super::permission_template::Column::Id"
    )]
    PermissionTemplate,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::permission_template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PermissionTemplate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

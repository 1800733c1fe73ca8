use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 模板-组授权实体
///
/// 对应数据库表 perm_templates_groups。`group_id` 为空表示 "Anyone"
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "perm_templates_groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub group_id: Option<i64>,

    pub template_id: i64,

    /// 权限 key，例如 user、admin
    pub permission_reference: String,

    #[sea_orm(column_type = "TimestampWithTimeZone")]
    pub created_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id"
    )]
    Group,
    #[sea_orm(
        belongs_to = "super::permission_template::Entity",
        from = "Column::TemplateId",
        to = "super::permission_template::Column::Id"
    )]
    PermissionTemplate,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::permission_template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PermissionTemplate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 用户实体
///
/// 对应数据库表 users，停用的用户不会出现在模板查询结果中
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// 登录名（唯一约束）
    #[sea_orm(unique)]
    pub login: String,

    /// 显示名称
    pub name: String,

    pub active: bool,

    #[sea_orm(column_type = "TimestampWithTimeZone")]
    pub created_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::perm_template_user::Entity")]
    PermTemplateUsers,
}

impl Related<super::perm_template_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PermTemplateUsers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

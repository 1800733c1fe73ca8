use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 用户组实体
///
/// 对应数据库表 groups。"Anyone" 不是真实的组，没有对应的行
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// 组名（唯一约束）
    #[sea_orm(unique)]
    pub name: String,

    pub description: Option<String>,

    #[sea_orm(column_type = "TimestampWithTimeZone")]
    pub created_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// 与模板授权表的一对多关系
    #[sea_orm(has_many = "super::perm_template_group::Entity")]
    PermTemplateGroups,
}

impl Related<super::perm_template_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PermTemplateGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

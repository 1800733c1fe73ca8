//! SeaORM 实体模块
//!
//! 权限模板相关的五张表：groups、users、permission_templates 以及两张授权关联表

pub mod group;
pub mod perm_template_group;
pub mod perm_template_user;
pub mod permission_template;
pub mod user;

/// Prelude 模块，重新导出常用的 SeaORM 实体和类型
pub mod prelude {
    pub use super::{
        group::Entity as Group,
        perm_template_group::Entity as PermTemplateGroup,
        perm_template_user::Entity as PermTemplateUser,
        permission_template::Entity as PermissionTemplate,
        user::Entity as User,

        group::Column as GroupColumn,
        perm_template_group::Column as PermTemplateGroupColumn,
        perm_template_user::Column as PermTemplateUserColumn,
        permission_template::Column as PermissionTemplateColumn,
        user::Column as UserColumn,
    };
}

pub use group::Model as GroupModel;
pub use perm_template_group::Model as PermTemplateGroupModel;
pub use perm_template_user::Model as PermTemplateUserModel;
pub use permission_template::Model as PermissionTemplateModel;
pub use user::Model as UserModel;

//! 模板授权查询：查询条件、结果行以及内存中的过滤/排序/分页

pub mod group_with_permission;
pub mod query;
pub mod user_with_permission;

pub use group_with_permission::{
    assemble_groups, suppress_anyone_without_permission, GroupRef, GroupWithPermission, ANYONE,
};
pub use query::{Membership, WithPermissionQuery, WithPermissionQueryBuilder, DEFAULT_PAGE_SIZE};
pub use user_with_permission::{assemble_users, UserWithPermission};

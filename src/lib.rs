pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod logging;
pub mod migration;
pub mod permission;
pub mod storage;

pub use db::repositories::{
    GroupRepository, NewPermissionTemplate, PermissionTemplateRepository, UserRepository,
};
pub use error::{Result, TemplateError};
pub use permission::{
    GroupRef, GroupWithPermission, Membership, UserWithPermission, WithPermissionQuery, ANYONE,
};
pub use storage::Storage;

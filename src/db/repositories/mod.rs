pub mod group_repository;
pub mod permission_template_repository;
pub mod user_repository;

pub use group_repository::GroupRepository;
pub use permission_template_repository::{NewPermissionTemplate, PermissionTemplateRepository};
pub use user_repository::UserRepository;

//! 测试数据集：模板 50 上的组、用户和授权，模板 51 用于验证按模板过滤

use crate::storage::Storage;
use std::sync::Arc;

pub(crate) const TEMPLATE_ID: i64 = 50;
pub(crate) const OTHER_TEMPLATE_ID: i64 = 51;

const TEMPLATES: &str = r#"
INSERT INTO permission_templates (id, name, kee, description, key_pattern, created_at, updated_at) VALUES
    (50, 'Default template', 'default_template_1356998400000', NULL, NULL, '2013-01-01T00:00:00+00:00', '2013-01-01T00:00:00+00:00'),
    (51, 'Open source', 'open_source_1356998400000', 'Public projects', '^oss\..*', '2013-01-01T00:00:00+00:00', '2013-01-01T00:00:00+00:00');
"#;

pub(crate) const GROUPS_WITH_PERMISSIONS: &str = r#"
INSERT INTO "groups" (id, name, description, created_at) VALUES
    (200, 'sonar-administrators', 'System administrators', '2013-01-01T00:00:00+00:00'),
    (201, 'sonar-users', 'Any new users created will automatically join this group', '2013-01-01T00:00:00+00:00'),
    (202, 'sonar-reviewers', 'Reviewers', '2013-01-01T00:00:00+00:00');

INSERT INTO perm_templates_groups (group_id, template_id, permission_reference, created_at) VALUES
    (NULL, 50, 'user', '2013-01-01T00:00:00+00:00'),
    (200, 50, 'user', '2013-01-01T00:00:00+00:00'),
    (200, 50, 'admin', '2013-01-01T00:00:00+00:00'),
    (201, 50, 'user', '2013-01-01T00:00:00+00:00'),
    (202, 50, 'codeviewer', '2013-01-01T00:00:00+00:00'),
    (NULL, 51, 'admin', '2013-01-01T00:00:00+00:00'),
    (202, 51, 'user', '2013-01-01T00:00:00+00:00');
"#;

/// 插入顺序与名称顺序相反
pub(crate) const GROUPS_INSERTED_OUT_OF_ORDER: &str = r#"
INSERT INTO "groups" (id, name, description, created_at) VALUES
    (200, 'sonar-users', NULL, '2013-01-01T00:00:00+00:00'),
    (201, 'sonar-reviewers', NULL, '2013-01-01T00:00:00+00:00'),
    (202, 'sonar-administrators', NULL, '2013-01-01T00:00:00+00:00');

INSERT INTO perm_templates_groups (group_id, template_id, permission_reference, created_at) VALUES
    (200, 50, 'user', '2013-01-01T00:00:00+00:00'),
    (202, 50, 'user', '2013-01-01T00:00:00+00:00'),
    (NULL, 50, 'user', '2013-01-01T00:00:00+00:00');
"#;

pub(crate) const USERS_WITH_PERMISSIONS: &str = r#"
INSERT INTO users (id, login, name, active, created_at) VALUES
    (100, 'marius', 'Marius', 1, '2013-01-01T00:00:00+00:00'),
    (101, 'arthur', 'Arthur', 1, '2013-01-01T00:00:00+00:00'),
    (102, 'hugo', 'Hugo', 0, '2013-01-01T00:00:00+00:00');

INSERT INTO perm_templates_users (user_id, template_id, permission_reference, created_at) VALUES
    (100, 50, 'user', '2013-01-01T00:00:00+00:00'),
    (101, 50, 'admin', '2013-01-01T00:00:00+00:00'),
    (102, 50, 'user', '2013-01-01T00:00:00+00:00'),
    (101, 51, 'user', '2013-01-01T00:00:00+00:00');
"#;

/// 创建内存数据库并载入模板和给定的数据集
pub(crate) async fn setup_data(datasets: &[&str]) -> Arc<Storage> {
    let storage = Storage::in_memory().await.unwrap();

    sqlx::raw_sql(TEMPLATES).execute(storage.pool()).await.unwrap();
    for dataset in datasets {
        sqlx::raw_sql(dataset).execute(storage.pool()).await.unwrap();
    }

    Arc::new(storage)
}

use permtemplate_lib::{
    GroupRef, GroupRepository, Membership, NewPermissionTemplate, PermissionTemplateRepository,
    Storage, TemplateError, UserRepository, WithPermissionQuery, ANYONE,
};
use std::sync::Arc;

async fn setup() -> (Arc<Storage>, i64) {
    let storage = Arc::new(Storage::in_memory().await.unwrap());
    let templates = PermissionTemplateRepository::new(storage.clone());
    let groups = GroupRepository::new(storage.clone());

    let template = templates
        .create_template(NewPermissionTemplate::new("Default template"))
        .await
        .unwrap();

    let admins = groups.insert("sonar-administrators", None).await.unwrap();
    let users = groups.insert("sonar-users", None).await.unwrap();
    groups.insert("sonar-reviewers", None).await.unwrap();

    let admins = GroupRef::Named { id: admins.id, name: admins.name };
    let users = GroupRef::Named { id: users.id, name: users.name };

    templates.add_group_permission(template.id, &GroupRef::Anyone, "user").await.unwrap();
    templates.add_group_permission(template.id, &admins, "user").await.unwrap();
    templates.add_group_permission(template.id, &admins, "admin").await.unwrap();
    templates.add_group_permission(template.id, &users, "user").await.unwrap();

    (storage, template.id)
}

fn query(permission: &str) -> WithPermissionQuery {
    WithPermissionQuery::builder().permission(permission).build().unwrap()
}

fn summary(rows: &[permtemplate_lib::GroupWithPermission]) -> Vec<(String, Option<String>)> {
    rows.iter()
        .map(|g| (g.name().to_string(), g.permission().map(str::to_string)))
        .collect()
}

#[tokio::test]
async fn test_groups_with_granted_permission() {
    let (storage, template_id) = setup().await;
    let templates = PermissionTemplateRepository::new(storage);

    let rows = templates.select_groups(&query("user"), template_id).await.unwrap();
    assert_eq!(
        summary(&rows),
        vec![
            (ANYONE.to_string(), Some("user".to_string())),
            ("sonar-administrators".to_string(), Some("user".to_string())),
            ("sonar-reviewers".to_string(), None),
            ("sonar-users".to_string(), Some("user".to_string())),
        ]
    );
}

#[tokio::test]
async fn test_anyone_is_hidden_without_permission() {
    let (storage, template_id) = setup().await;
    let templates = PermissionTemplateRepository::new(storage);

    let rows = templates.select_groups(&query("admin"), template_id).await.unwrap();
    assert_eq!(
        summary(&rows),
        vec![
            ("sonar-administrators".to_string(), Some("admin".to_string())),
            ("sonar-reviewers".to_string(), None),
            ("sonar-users".to_string(), None),
        ]
    );
}

#[tokio::test]
async fn test_search_and_membership() {
    let (storage, template_id) = setup().await;
    let templates = PermissionTemplateRepository::new(storage);

    let search = WithPermissionQuery::builder()
        .permission("user")
        .search("USERS")
        .build()
        .unwrap();
    let rows = templates.select_groups(&search, template_id).await.unwrap();
    assert_eq!(
        summary(&rows),
        vec![("sonar-users".to_string(), Some("user".to_string()))]
    );

    let outsiders = WithPermissionQuery::builder()
        .permission("user")
        .membership(Membership::Out)
        .build()
        .unwrap();
    let rows = templates.select_groups(&outsiders, template_id).await.unwrap();
    assert_eq!(summary(&rows), vec![("sonar-reviewers".to_string(), None)]);
}

#[tokio::test]
async fn test_revoking_anyone_hides_it() {
    let (storage, template_id) = setup().await;
    let templates = PermissionTemplateRepository::new(storage);

    let removed = templates
        .remove_group_permission(template_id, &GroupRef::Anyone, "user")
        .await
        .unwrap();
    assert_eq!(removed, 1);

    let rows = templates.select_groups(&query("user"), template_id).await.unwrap();
    assert!(rows.iter().all(|g| g.name() != ANYONE));
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn test_users_with_permission_skip_inactive() {
    let (storage, template_id) = setup().await;
    let templates = PermissionTemplateRepository::new(storage.clone());
    let users = UserRepository::new(storage);

    let marius = users.insert("marius", "Marius").await.unwrap();
    let hugo = users.insert("hugo", "Hugo").await.unwrap();
    templates.add_user_permission(template_id, marius.id, "user").await.unwrap();
    templates.add_user_permission(template_id, hugo.id, "user").await.unwrap();
    users.deactivate("hugo").await.unwrap();

    let rows = templates.select_users(&query("user"), template_id).await.unwrap();
    let logins: Vec<&str> = rows.iter().map(|u| u.login.as_str()).collect();
    assert_eq!(logins, vec!["marius"]);
    assert!(rows[0].has_permission());
}

#[tokio::test]
async fn test_anyone_is_a_reserved_group_name() {
    let (storage, _) = setup().await;
    let groups = GroupRepository::new(storage);

    let err = groups.insert("anyone", None).await.unwrap_err();
    assert!(matches!(err, TemplateError::ValidationError(_)));
    assert_eq!(groups.resolve("Anyone").await.unwrap(), GroupRef::Anyone);
}

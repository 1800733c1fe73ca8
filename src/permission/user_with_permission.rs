use super::query::WithPermissionQuery;

/// 用户及其在模板上的授权标记
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithPermission {
    pub login: String,
    pub name: String,
    pub permission: Option<String>,
}

impl UserWithPermission {
    pub fn has_permission(&self) -> bool {
        self.permission.is_some()
    }
}

/// 搜索同时匹配登录名和显示名称，按名称、登录名排序后分页
pub fn assemble_users(rows: Vec<UserWithPermission>, query: &WithPermissionQuery) -> Vec<UserWithPermission> {
    let mut rows: Vec<UserWithPermission> = rows
        .into_iter()
        .filter(|row| query.matches_search([row.login.as_str(), row.name.as_str()]))
        .filter(|row| query.membership().accepts(row.has_permission()))
        .collect();

    rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.login.cmp(&b.login)));
    query.paginate(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(login: &str, name: &str, permission: Option<&str>) -> UserWithPermission {
        UserWithPermission {
            login: login.to_string(),
            name: name.to_string(),
            permission: permission.map(str::to_string),
        }
    }

    #[test]
    fn test_assemble_users_search_matches_login_or_name() {
        let query = WithPermissionQuery::builder()
            .permission("user")
            .search("mar")
            .build()
            .unwrap();
        let rows = vec![
            user("marius", "Marius", Some("user")),
            user("arthur", "Arthur", None),
            user("jdoe", "Martin Doe", None),
        ];

        let result = assemble_users(rows, &query);
        let logins: Vec<&str> = result.iter().map(|u| u.login.as_str()).collect();
        assert_eq!(logins, vec!["marius", "jdoe"]);
    }

    #[test]
    fn test_assemble_users_sorted_by_name_then_login() {
        let query = WithPermissionQuery::builder().permission("user").build().unwrap();
        let rows = vec![
            user("z-smith", "Smith", None),
            user("a-smith", "Smith", None),
            user("arthur", "Arthur", None),
        ];

        let result = assemble_users(rows, &query);
        let logins: Vec<&str> = result.iter().map(|u| u.login.as_str()).collect();
        assert_eq!(logins, vec!["arthur", "a-smith", "z-smith"]);
    }
}

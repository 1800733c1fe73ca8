use super::query::WithPermissionQuery;

/// "Anyone" 组的显示名称，代表所有用户（包括未登录用户）
pub const ANYONE: &str = "Anyone";

/// 查询结果中的组：真实的组，或没有对应数据行的 "Anyone"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRef {
    Anyone,
    Named { id: i64, name: String },
}

impl GroupRef {
    pub fn name(&self) -> &str {
        match self {
            GroupRef::Anyone => ANYONE,
            GroupRef::Named { name, .. } => name,
        }
    }

    /// 数据库中的 group_id，Anyone 存储为 NULL
    pub fn id(&self) -> Option<i64> {
        match self {
            GroupRef::Anyone => None,
            GroupRef::Named { id, .. } => Some(*id),
        }
    }

    pub fn is_anyone(&self) -> bool {
        matches!(self, GroupRef::Anyone)
    }

    /// 真实的组不能使用 "Anyone" 作为名称
    pub fn is_reserved_name(name: &str) -> bool {
        name.trim().eq_ignore_ascii_case(ANYONE)
    }
}

/// 组及其在模板上的授权标记
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupWithPermission {
    pub group: GroupRef,
    /// 持有查询的权限时为 Some
    pub permission: Option<String>,
}

impl GroupWithPermission {
    pub fn name(&self) -> &str {
        self.group.name()
    }

    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn has_permission(&self) -> bool {
        self.permission.is_some()
    }
}

/// 没有持有权限的 Anyone 不出现在结果中，其他组始终保留
pub fn suppress_anyone_without_permission(rows: Vec<GroupWithPermission>) -> Vec<GroupWithPermission> {
    rows.into_iter()
        .filter(|row| !(row.group.is_anyone() && !row.has_permission()))
        .collect()
}

/// 对数据库取回的行依次执行：Anyone 过滤、名称搜索、membership 过滤、按名称排序、分页
pub fn assemble_groups(
    rows: Vec<GroupWithPermission>,
    query: &WithPermissionQuery,
) -> Vec<GroupWithPermission> {
    let mut rows: Vec<GroupWithPermission> = suppress_anyone_without_permission(rows)
        .into_iter()
        .filter(|row| query.matches_search([row.name()]))
        .filter(|row| query.membership().accepts(row.has_permission()))
        .collect();

    rows.sort_by(|a, b| a.name().cmp(b.name()));
    query.paginate(rows)
}

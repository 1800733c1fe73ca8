use crate::error::{Result, TemplateError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// 按是否持有权限过滤结果
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    /// 只返回持有权限的行
    In,
    /// 只返回未持有权限的行
    Out,
    /// 不过滤
    #[default]
    Any,
}

impl Membership {
    pub fn accepts(self, has_permission: bool) -> bool {
        match self {
            Membership::In => has_permission,
            Membership::Out => !has_permission,
            Membership::Any => true,
        }
    }
}

/// 模板授权查询条件，通过 [`WithPermissionQuery::builder`] 构建
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithPermissionQuery {
    permission: String,
    /// 已转为小写
    search: Option<String>,
    membership: Membership,
    page_index: usize,
    page_size: usize,
}

impl WithPermissionQuery {
    pub fn builder() -> WithPermissionQueryBuilder {
        WithPermissionQueryBuilder::default()
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn membership(&self) -> Membership {
        self.membership
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// 未设置搜索词，或任一候选字符串包含搜索词（不区分大小写）
    pub fn matches_search<'a, I>(&self, candidates: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        match self.search {
            None => true,
            Some(ref search) => candidates
                .into_iter()
                .any(|candidate| candidate.to_lowercase().contains(search.as_str())),
        }
    }

    /// 对已排序的结果分页
    pub fn paginate<T>(&self, rows: Vec<T>) -> Vec<T> {
        let offset = (self.page_index - 1).saturating_mul(self.page_size);
        rows.into_iter().skip(offset).take(self.page_size).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WithPermissionQueryBuilder {
    permission: Option<String>,
    search: Option<String>,
    membership: Membership,
    page_index: Option<usize>,
    page_size: Option<usize>,
}

impl WithPermissionQueryBuilder {
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn membership(mut self, membership: Membership) -> Self {
        self.membership = membership;
        self
    }

    pub fn page_index(mut self, page_index: usize) -> Self {
        self.page_index = Some(page_index);
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn build(self) -> Result<WithPermissionQuery> {
        let permission = self
            .permission
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| TemplateError::ValidationError("Permission cannot be empty".to_string()))?;

        let page_index = self.page_index.unwrap_or(1);
        if page_index == 0 {
            return Err(TemplateError::ValidationError(
                "Page index must be strictly positive".to_string(),
            ));
        }

        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(TemplateError::ValidationError(
                "Page size must be strictly positive".to_string(),
            ));
        }

        let search = self
            .search
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.to_lowercase());

        Ok(WithPermissionQuery {
            permission,
            search,
            membership: self.membership,
            page_index,
            page_size,
        })
    }
}

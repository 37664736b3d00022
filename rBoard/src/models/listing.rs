//! Post listing: search, sort and pagination.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::UserId;

/// Posts per listing page.
pub const POSTS_PER_PAGE: u32 = 10;

/// Page numbers shown per pager group.
pub const PAGE_GROUP_SIZE: u32 = 5;

/// Which fields a search term is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Title or content.
    #[default]
    All,
    /// Title only.
    Title,
    /// Content only.
    Content,
    /// Author name.
    Author,
}

impl SearchType {
    /// Get the API parameter value.
    pub fn param(&self) -> &'static str {
        match self {
            SearchType::All => "all",
            SearchType::Title => "title",
            SearchType::Content => "content",
            SearchType::Author => "author",
        }
    }
}

impl FromStr for SearchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(SearchType::All),
            "title" => Ok(SearchType::Title),
            "content" => Ok(SearchType::Content),
            "author" => Ok(SearchType::Author),
            other => Err(format!("unknown search type: {}", other)),
        }
    }
}

/// Sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortBy {
    /// Creation date.
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
    /// View count.
    #[serde(rename = "view_cnt")]
    Views,
}

impl SortBy {
    pub fn param(&self) -> &'static str {
        match self {
            SortBy::CreatedAt => "createdAt",
            SortBy::Views => "view_cnt",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Descending.
    #[default]
    Desc,
    /// Ascending.
    Asc,
}

impl SortOrder {
    pub fn param(&self) -> &'static str {
        match self {
            SortOrder::Desc => "desc",
            SortOrder::Asc => "asc",
        }
    }
}

/// Sort key and direction, written as `createdAt-desc`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub by: SortBy,
    pub order: SortOrder,
}

impl Sort {
    pub fn new(by: SortBy, order: SortOrder) -> Self {
        Self { by, order }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.by.param(), self.order.param())
    }
}

impl FromStr for Sort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (by, order) = s
            .split_once('-')
            .ok_or_else(|| format!("expected <key>-<order>, got {}", s))?;
        let by = match by {
            "createdAt" => SortBy::CreatedAt,
            "view_cnt" | "views" => SortBy::Views,
            other => return Err(format!("unknown sort key: {}", other)),
        };
        let order = match order {
            "desc" => SortOrder::Desc,
            "asc" => SortOrder::Asc,
            other => return Err(format!("unknown sort order: {}", other)),
        };
        Ok(Sort { by, order })
    }
}

/// Query for one listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    page: u32,
    search: Option<String>,
    search_type: SearchType,
    author_id: Option<UserId>,
    sort: Sort,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            page: 1,
            search: None,
            search_type: SearchType::All,
            author_id: None,
            sort: Sort::default(),
        }
    }
}

impl PostQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current page, starting at 1.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Active search term, if any.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn search_type(&self) -> SearchType {
        self.search_type
    }

    pub fn author_id(&self) -> Option<&UserId> {
        self.author_id.as_ref()
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    /// Go to a page. Pages below 1 become 1.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Search for a term. A blank term clears the search. Resets to page 1.
    pub fn with_search(mut self, term: &str, search_type: SearchType) -> Self {
        let term = term.trim();
        self.search = (!term.is_empty()).then(|| term.to_owned());
        self.search_type = search_type;
        self.reset_page()
    }

    /// Only list posts by this author. Resets to page 1.
    pub fn with_author(mut self, author: Option<UserId>) -> Self {
        self.author_id = author.filter(|a| !a.is_empty());
        self.reset_page()
    }

    /// Change the sort. Resets to page 1.
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self.reset_page()
    }

    pub fn reset_page(mut self) -> Self {
        self.page = 1;
        self
    }

    /// Query parameters for `GET posts`.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string())];
        if let Some(author) = &self.author_id {
            pairs.push(("author_id", author.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
            pairs.push(("search_type", self.search_type.param().to_owned()));
        }
        pairs.push(("sortBy", self.sort.by.param().to_owned()));
        pairs.push(("sortOrder", self.sort.order.param().to_owned()));
        pairs
    }
}

/// Pagination state derived from a listing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl Pagination {
    pub fn new(page: u32, total: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: POSTS_PER_PAGE,
            total,
        }
    }

    /// Number of pages. Zero when there are no posts.
    pub fn total_pages(&self) -> u32 {
        let per_page = u64::from(self.per_page.max(1));
        self.total.div_ceil(per_page) as u32
    }

    /// Whether a pager is worth showing.
    pub fn has_pager(&self) -> bool {
        self.total_pages() > 1
    }

    /// Descending row number for the `index`-th post on this page.
    pub fn post_number(&self, index: usize) -> i64 {
        let skipped = u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page);
        let offset = skipped + index as u64;
        self.total as i64 - offset as i64
    }

    /// First page of the current group.
    pub fn group_start(&self) -> u32 {
        self.page.saturating_sub(1) / PAGE_GROUP_SIZE * PAGE_GROUP_SIZE + 1
    }

    /// Last page of the current group.
    pub fn group_end(&self) -> u32 {
        (self.group_start() + PAGE_GROUP_SIZE - 1).min(self.total_pages())
    }

    /// Pages in the current group.
    pub fn group_pages(&self) -> std::ops::RangeInclusive<u32> {
        self.group_start()..=self.group_end()
    }

    pub fn has_previous_group(&self) -> bool {
        self.group_start() > 1
    }

    /// Page the "previous" control goes to.
    pub fn previous_group_page(&self) -> Option<u32> {
        self.has_previous_group().then(|| self.group_start() - 1)
    }

    pub fn has_next_group(&self) -> bool {
        self.group_end() < self.total_pages()
    }

    /// Page the "next" control goes to.
    pub fn next_group_page(&self) -> Option<u32> {
        self.has_next_group().then(|| self.group_end() + 1)
    }

    pub fn can_go_to(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sort_parse() {
        let sort: Sort = "view_cnt-asc".parse().unwrap();
        assert_eq!(sort, Sort::new(SortBy::Views, SortOrder::Asc));
        assert_eq!(Sort::default().to_string(), "createdAt-desc");
        assert!("createdAt".parse::<Sort>().is_err());
        assert!("title-desc".parse::<Sort>().is_err());
    }

    #[test]
    fn test_query_pairs() {
        let query = PostQuery::new().with_page(3);
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("page", "3".to_owned()),
                ("sortBy", "createdAt".to_owned()),
                ("sortOrder", "desc".to_owned()),
            ]
        );

        let query = PostQuery::new()
            .with_page(4)
            .with_search("  rust ", SearchType::Title)
            .with_author(Some(UserId::new("hong")));
        assert_eq!(query.page(), 1);
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("page", "1".to_owned()),
                ("author_id", "hong".to_owned()),
                ("search", "rust".to_owned()),
                ("search_type", "title".to_owned()),
                ("sortBy", "createdAt".to_owned()),
                ("sortOrder", "desc".to_owned()),
            ]
        );
    }

    #[test]
    fn test_blank_search_dropped() {
        let query = PostQuery::new().with_search("   ", SearchType::Content);
        assert_eq!(query.search(), None);
        assert!(!query.to_query_pairs().iter().any(|(k, _)| *k == "search"));
        assert_eq!(PostQuery::new().with_page(0).page(), 1);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(Pagination::new(1, 0).total_pages(), 0);
        assert_eq!(Pagination::new(1, 10).total_pages(), 1);
        assert_eq!(Pagination::new(1, 11).total_pages(), 2);
        assert!(!Pagination::new(1, 10).has_pager());
    }

    #[test]
    fn test_post_number() {
        let p = Pagination::new(2, 23);
        assert_eq!(p.post_number(0), 13);
        assert_eq!(p.post_number(9), 4);
    }

    #[test]
    fn test_page_zero_reads_as_first_page() {
        let p = Pagination {
            page: 0,
            per_page: 10,
            total: 5,
        };
        assert_eq!(p.post_number(0), 5);
        assert_eq!(p.group_start(), 1);
        assert_eq!(p.group_pages(), 1..=1);
        assert!(!p.has_previous_group());
    }

    #[test]
    fn test_page_groups() {
        let p = Pagination::new(7, 123);
        assert_eq!(p.total_pages(), 13);
        assert_eq!(p.group_pages(), 6..=10);
        assert_eq!(p.previous_group_page(), Some(5));
        assert_eq!(p.next_group_page(), Some(11));

        let last = Pagination::new(12, 123);
        assert_eq!(last.group_pages(), 11..=13);
        assert_eq!(last.next_group_page(), None);

        let first = Pagination::new(1, 30);
        assert_eq!(first.group_pages(), 1..=3);
        assert!(!first.has_previous_group());
        assert!(first.can_go_to(3));
        assert!(!first.can_go_to(4));
        assert!(!first.can_go_to(0));
    }
}

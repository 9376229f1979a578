use crate::shared::response::JsonApiLinks;
use axum::http::Uri;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// `page[number]` / `page[size]` query parameters, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams, ToSchema)]
#[serde(default)]
pub struct PageParams {
    #[param(example = 1, minimum = 1)]
    pub number: i64,
    #[param(example = 20, minimum = 1, maximum = 100)]
    pub size: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            number: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    /// Clamp into the accepted range.
    pub fn normalized(self) -> Self {
        Self {
            number: self.number.max(1),
            size: self.size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.size
    }
}

/// Builds JSON:API `self`/`first`/`last`/`prev`/`next` links.
pub struct PaginationLinkBuilder {
    base_url: String,
    page: PageParams,
    total_pages: i64,
}

impl PaginationLinkBuilder {
    pub fn new(base_url: impl Into<String>, page: PageParams, total: i64) -> Self {
        let total_pages = if total > 0 {
            (total + page.size - 1) / page.size
        } else {
            0
        };

        Self {
            base_url: base_url.into(),
            page,
            total_pages,
        }
    }

    /// Links are rooted at the request path; the query string is rebuilt.
    pub fn from_uri(uri: &Uri, page: PageParams, total: i64) -> Self {
        Self::new(uri.path(), page, total)
    }

    pub fn build(self) -> JsonApiLinks {
        let mut links = JsonApiLinks::new()
            .with_self(self.page_link(self.page.number))
            .with_first(self.page_link(1));

        if self.total_pages > 0 {
            links = links.with_last(self.page_link(self.total_pages));
        }
        if self.page.number > 1 {
            links = links.with_prev(self.page_link(self.page.number - 1));
        }
        if self.page.number < self.total_pages {
            links = links.with_next(self.page_link(self.page.number + 1));
        }

        links
    }

    fn page_link(&self, number: i64) -> String {
        format!(
            "{}?page[number]={}&page[size]={}",
            self.base_url, number, self.page.size
        )
    }
}

//! Cursor pagination for GraphQL connections
//!
//! Every list query in the API returns a relay-style connection
//! (`nodes` + `pageInfo { hasNextPage endCursor }`). [`collect_pages`] follows
//! the cursor until the last page or until an item limit is reached.

use std::future::Future;

use log::{debug, warn};
use serde::Deserialize;

use crate::error::Result;

/// Page size for graph searches.
pub const GRAPH_PAGE_SIZE: usize = 500;

/// Page size for project, account and provider listings.
pub const LIST_PAGE_SIZE: usize = 500;

/// Graph search stops returning results past this many rows.
pub const MAX_GRAPH_RESULTS: usize = 10_000;

/// Cursor state of a connection page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,

    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// One page of a GraphQL connection
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,

    #[serde(default)]
    pub page_info: PageInfo,

    #[serde(default)]
    pub total_count: Option<usize>,
}

impl<T> Connection<T> {
    /// Single-page connection, mostly for tests and mocks.
    pub fn single(nodes: Vec<T>) -> Self {
        Self {
            nodes,
            page_info: PageInfo::default(),
            total_count: None,
        }
    }

    /// Cursor for the following page, if there is one.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.page_info.has_next_page {
            self.page_info.end_cursor.as_deref()
        } else {
            None
        }
    }
}

/// Items collected across pages
#[derive(Debug, Clone)]
pub struct Collected<T> {
    pub items: Vec<T>,

    /// True when collection stopped at the limit with pages left
    pub truncated: bool,
}

/// Follow a connection from the first page until exhausted or `limit` items.
///
/// `fetch` receives the cursor of the page to load (`None` for the first).
pub async fn collect_pages<T, F, Fut>(limit: Option<usize>, mut fetch: F) -> Result<Collected<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Connection<T>>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page = 0usize;

    loop {
        let connection = fetch(cursor.take()).await?;
        page += 1;
        let next = connection.next_cursor().map(str::to_string);
        items.extend(connection.nodes);
        debug!("Fetched page {} ({} items so far)", page, items.len());

        if let Some(max) = limit {
            if items.len() >= max {
                let truncated = next.is_some() || items.len() > max;
                items.truncate(max);
                if truncated {
                    warn!("Stopped after {} results; remaining pages were not fetched", max);
                }
                return Ok(Collected { items, truncated });
            }
        }

        match next {
            Some(c) => cursor = Some(c),
            None => {
                return Ok(Collected {
                    items,
                    truncated: false,
                });
            }
        }
    }
}

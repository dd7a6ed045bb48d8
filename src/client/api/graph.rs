//! Security graph API trait

use async_trait::async_trait;

use crate::client::models::{GraphQueryNode, GraphSearchRow};
use crate::client::pagination::{
    Collected, Connection, GRAPH_PAGE_SIZE, MAX_GRAPH_RESULTS, collect_pages,
};
use crate::error::Result;

/// Graph search operations for the Wiz API
#[async_trait]
pub trait GraphApi: Send + Sync {
    /// Fetch one page of rows matching a graph query.
    ///
    /// Each row holds one entity per selected node, in the depth-first order
    /// of the query tree; optional nodes without a match are null.
    async fn graph_search(
        &self,
        query: &GraphQueryNode,
        first: usize,
        after: Option<String>,
    ) -> Result<Connection<GraphSearchRow>>;

    /// Fetch every row, stopping at the graph search result cap.
    async fn graph_search_all(&self, query: &GraphQueryNode) -> Result<Collected<GraphSearchRow>> {
        collect_pages(Some(MAX_GRAPH_RESULTS), |after| {
            self.graph_search(query, GRAPH_PAGE_SIZE, after)
        })
        .await
    }
}

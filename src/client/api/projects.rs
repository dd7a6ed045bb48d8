//! Project API trait

use async_trait::async_trait;

use crate::client::models::{
    CloudAccount, CloudOrganization, CreateProjectInput, Project, ProjectFilter,
    UpdateProjectInput,
};
use crate::client::pagination::{Connection, LIST_PAGE_SIZE, collect_pages};
use crate::error::Result;

/// Project and cloud inventory operations for the Wiz API
#[async_trait]
pub trait ProjectApi: Send + Sync {
    // ========================================================================
    // Read Operations
    // ========================================================================

    /// Fetch one page of projects matching a filter, ordered by name.
    async fn list_projects(
        &self,
        filter: &ProjectFilter,
        first: usize,
        after: Option<String>,
    ) -> Result<Connection<Project>>;

    /// Fetch every project matching a filter.
    async fn list_all_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>> {
        let collected = collect_pages(None, |after| {
            self.list_projects(filter, LIST_PAGE_SIZE, after)
        })
        .await?;
        Ok(collected.items)
    }

    /// Search connected cloud accounts by name or external ID.
    async fn search_cloud_accounts(&self, search: &str) -> Result<Vec<CloudAccount>>;

    /// Search connected cloud organizations by name or external ID.
    async fn search_cloud_organizations(&self, search: &str) -> Result<Vec<CloudOrganization>>;

    // ========================================================================
    // Write Operations
    // ========================================================================

    /// Create a project or folder project; returns the new project ID.
    async fn create_project(&self, input: &CreateProjectInput) -> Result<String>;

    /// Apply a patch to an existing project; returns the project ID.
    async fn update_project(&self, input: &UpdateProjectInput) -> Result<String>;
}

//! Mock Wiz API client for testing
//!
//! Provides an in-memory implementation of the API traits for unit testing
//! without making real API calls. Projects created or patched through the
//! mock are visible to later listings, so multi-step flows can be exercised.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::api::{AuthApi, GraphApi, ProjectApi, SamlApi};
use super::models::{
    AccessToken, CloudAccount, CloudOrganization, CreateProjectInput, GraphQueryNode,
    GraphSearchRow, Project, ProjectFilter, ProjectRef, SamlProvider, SamlProviderSummary,
    UpdateProjectInput, UpdateSamlProviderInput,
};
use super::pagination::{Connection, PageInfo};
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockWizClient::new()
///     .with_graph_rows("mg-root", rows)
///     .await;
///
/// let page = mock.graph_search(&query, 500, None).await?;
/// ```
#[derive(Default)]
pub struct MockWizClient {
    /// Graph rows keyed by a marker string that must appear in the query
    graph_rows: Arc<Mutex<Vec<(String, Vec<GraphSearchRow>)>>>,
    /// Project store, mutated by create/update
    projects: Arc<Mutex<Vec<Project>>>,
    /// Cloud accounts to search
    accounts: Arc<Mutex<Vec<CloudAccount>>>,
    /// Cloud organizations to search
    organizations: Arc<Mutex<Vec<CloudOrganization>>>,
    /// Identity providers
    providers: Arc<Mutex<Vec<SamlProvider>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Captured mutation inputs and queries
    captured: Arc<Mutex<Captured>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub authenticate: usize,
    pub graph_search: usize,
    pub list_projects: usize,
    pub search_cloud_accounts: usize,
    pub search_cloud_organizations: usize,
    pub create_project: usize,
    pub update_project: usize,
    pub list_saml_providers: usize,
    pub get_saml_provider: usize,
    pub update_saml_provider: usize,
}

impl CallCounts {
    /// Number of write calls made.
    pub fn mutations(&self) -> usize {
        self.create_project + self.update_project + self.update_saml_provider
    }
}

/// Requests captured for test assertions
#[derive(Default, Debug, Clone)]
pub struct Captured {
    pub graph_queries: Vec<GraphQueryNode>,
    pub created: Vec<CreateProjectInput>,
    pub updated: Vec<UpdateProjectInput>,
    pub saml_updates: Vec<UpdateSamlProviderInput>,
}

impl MockWizClient {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `rows` for graph queries whose JSON contains `marker`.
    pub async fn with_graph_rows(self, marker: &str, rows: Vec<GraphSearchRow>) -> Self {
        self.graph_rows
            .lock()
            .await
            .push((marker.to_string(), rows));
        self
    }

    /// Seed the project store.
    pub async fn with_projects(self, projects: Vec<Project>) -> Self {
        *self.projects.lock().await = projects;
        self
    }

    /// Seed the cloud account inventory.
    pub async fn with_accounts(self, accounts: Vec<CloudAccount>) -> Self {
        *self.accounts.lock().await = accounts;
        self
    }

    /// Seed the cloud organization inventory.
    pub async fn with_organizations(self, organizations: Vec<CloudOrganization>) -> Self {
        *self.organizations.lock().await = organizations;
        self
    }

    /// Seed identity providers.
    pub async fn with_providers(self, providers: Vec<SamlProvider>) -> Self {
        *self.providers.lock().await = providers;
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Get captured requests for test assertions.
    pub async fn captured(&self) -> Captured {
        self.captured.lock().await.clone()
    }

    /// Current contents of the project store.
    pub async fn projects(&self) -> Vec<Project> {
        self.projects.lock().await.clone()
    }

    /// Check if there's a pending error and consume it.
    async fn check_error(&self) -> Result<()> {
        let mut error = self.error.lock().await;
        if let Some(e) = error.take() {
            return Err(e.into());
        }
        Ok(())
    }
}

/// Page `items` using stringified offsets as cursors.
fn page_of<T: Clone>(items: &[T], first: usize, after: Option<String>) -> Connection<T> {
    let start = after.and_then(|a| a.parse::<usize>().ok()).unwrap_or(0);
    let end = (start + first.max(1)).min(items.len());
    let nodes = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();
    let has_next_page = end < items.len();
    Connection {
        nodes,
        page_info: PageInfo {
            has_next_page,
            end_cursor: has_next_page.then(|| end.to_string()),
        },
        total_count: Some(items.len()),
    }
}

fn matches_filter(project: &Project, filter: &ProjectFilter) -> bool {
    if let Some(id) = &filter.id {
        if &project.id != id {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        if !project.name.to_lowercase().contains(&search.to_lowercase()) {
            return false;
        }
    }
    if let Some(is_folder) = filter.is_folder {
        if project.is_folder != is_folder {
            return false;
        }
    }
    if let Some(parent) = &filter.parent_project_id {
        if project.ancestor_projects.first().map(|p| &p.id) != Some(parent) {
            return false;
        }
    }
    filter.include_archived.unwrap_or(false) || !project.archived
}

// ============================================================================
// AuthApi Implementation
// ============================================================================

#[async_trait]
impl AuthApi for MockWizClient {
    async fn authenticate(&self, _client_id: &str, _client_secret: &str) -> Result<AccessToken> {
        self.check_error().await?;
        self.call_count.lock().await.authenticate += 1;

        Ok(AccessToken {
            token: "mock-access-token".to_string(),
            expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
            issued_at: Some(chrono::Utc::now()),
        })
    }
}

// ============================================================================
// GraphApi Implementation
// ============================================================================

#[async_trait]
impl GraphApi for MockWizClient {
    async fn graph_search(
        &self,
        query: &GraphQueryNode,
        first: usize,
        after: Option<String>,
    ) -> Result<Connection<GraphSearchRow>> {
        self.check_error().await?;
        self.call_count.lock().await.graph_search += 1;
        self.captured.lock().await.graph_queries.push(query.clone());

        let json = serde_json::to_string(query)?;
        let sets = self.graph_rows.lock().await;
        let rows = sets
            .iter()
            .find(|(marker, _)| json.contains(&format!("\"{}\"", marker)))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default();
        Ok(page_of(&rows, first, after))
    }
}

// ============================================================================
// ProjectApi Implementation
// ============================================================================

#[async_trait]
impl ProjectApi for MockWizClient {
    async fn list_projects(
        &self,
        filter: &ProjectFilter,
        first: usize,
        after: Option<String>,
    ) -> Result<Connection<Project>> {
        self.check_error().await?;
        self.call_count.lock().await.list_projects += 1;

        let mut matching: Vec<Project> = self
            .projects
            .lock()
            .await
            .iter()
            .filter(|p| matches_filter(p, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(page_of(&matching, first, after))
    }

    async fn search_cloud_accounts(&self, search: &str) -> Result<Vec<CloudAccount>> {
        self.check_error().await?;
        self.call_count.lock().await.search_cloud_accounts += 1;

        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .filter(|a| a.external_id.as_deref() == Some(search) || a.name.contains(search))
            .cloned()
            .collect())
    }

    async fn search_cloud_organizations(&self, search: &str) -> Result<Vec<CloudOrganization>> {
        self.check_error().await?;
        self.call_count.lock().await.search_cloud_organizations += 1;

        Ok(self
            .organizations
            .lock()
            .await
            .iter()
            .filter(|o| o.external_id.as_deref() == Some(search) || o.name.contains(search))
            .cloned()
            .collect())
    }

    async fn create_project(&self, input: &CreateProjectInput) -> Result<String> {
        self.check_error().await?;
        self.call_count.lock().await.create_project += 1;
        self.captured.lock().await.created.push(input.clone());

        let mut projects = self.projects.lock().await;
        let id = format!("proj-{}", projects.len() + 1);
        projects.push(Project {
            id: id.clone(),
            name: input.name.clone(),
            slug: Some(input.name.to_lowercase().replace(' ', "-")),
            is_folder: input.is_folder,
            archived: false,
            child_project_count: 0,
            cloud_account_links: Vec::new(),
            cloud_organization_links: Vec::new(),
            ancestor_projects: input
                .parent_project_id
                .iter()
                .map(|id| ProjectRef { id: id.clone() })
                .collect(),
        });
        if let Some(parent_id) = &input.parent_project_id {
            if let Some(parent) = projects.iter_mut().find(|p| &p.id == parent_id) {
                parent.child_project_count += 1;
            }
        }
        Ok(id)
    }

    async fn update_project(&self, input: &UpdateProjectInput) -> Result<String> {
        self.check_error().await?;
        self.call_count.lock().await.update_project += 1;
        self.captured.lock().await.updated.push(input.clone());

        let mut projects = self.projects.lock().await;
        let project = projects
            .iter_mut()
            .find(|p| p.id == input.id)
            .ok_or_else(|| ApiError::GraphQl(format!("project {} not found", input.id)))?;
        if let Some(name) = &input.patch.name {
            project.name = name.clone();
        }
        if let Some(slug) = &input.patch.slug {
            project.slug = Some(slug.clone());
        }
        if let Some(archived) = input.patch.archived {
            project.archived = archived;
        }
        Ok(project.id.clone())
    }
}

// ============================================================================
// SamlApi Implementation
// ============================================================================

#[async_trait]
impl SamlApi for MockWizClient {
    async fn list_saml_providers(&self) -> Result<Vec<SamlProviderSummary>> {
        self.check_error().await?;
        self.call_count.lock().await.list_saml_providers += 1;

        Ok(self
            .providers
            .lock()
            .await
            .iter()
            .map(|p| SamlProviderSummary {
                id: p.id.clone(),
                name: p.name.clone(),
                login_url: p.login_url.clone(),
            })
            .collect())
    }

    async fn get_saml_provider(&self, id: &str) -> Result<SamlProvider> {
        self.check_error().await?;
        self.call_count.lock().await.get_saml_provider += 1;

        self.providers
            .lock()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| {
                ApiError::InvalidResponse(format!("identity provider {} not found", id)).into()
            })
    }

    async fn update_saml_provider(&self, input: &UpdateSamlProviderInput) -> Result<()> {
        self.check_error().await?;
        self.call_count.lock().await.update_saml_provider += 1;
        self.captured.lock().await.saml_updates.push(input.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, name: &str, is_folder: bool) -> Project {
        serde_json::from_value(serde_json::json!({
            "id": id, "name": name, "isFolder": is_folder
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_mock_pages_projects() {
        let mock = MockWizClient::new()
            .with_projects(vec![
                project("1", "a", false),
                project("2", "b", false),
                project("3", "c", false),
            ])
            .await;

        let all = mock
            .list_all_projects(&ProjectFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let first = mock
            .list_projects(&ProjectFilter::default(), 2, None)
            .await
            .unwrap();
        assert_eq!(first.nodes.len(), 2);
        assert_eq!(first.next_cursor(), Some("2"));
    }

    #[tokio::test]
    async fn test_mock_created_projects_are_listed() {
        let mock = MockWizClient::new();
        let id = mock
            .create_project(&CreateProjectInput::folder("Root", None))
            .await
            .unwrap();

        let found = mock
            .list_all_projects(&ProjectFilter::by_name("root", Some(true)))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
        assert_eq!(mock.call_counts().await.mutations(), 1);
    }

    #[tokio::test]
    async fn test_mock_error_is_consumed() {
        let mock = MockWizClient::new().with_error(ApiError::Forbidden).await;
        assert!(mock.list_saml_providers().await.is_err());
        assert!(mock.list_saml_providers().await.is_ok());
    }
}

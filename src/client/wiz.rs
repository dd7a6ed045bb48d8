//! Wiz GraphQL API client implementation

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::{debug, warn};
use reqwest::{Client as HttpClient, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::RwLock;

use super::api::{AuthApi, GraphApi, ProjectApi, SamlApi};
use super::graphql::{GraphQlRequest, GraphQlResponse};
use super::models::{
    AccessToken, CloudAccount, CloudOrganization, CreateProjectInput, GraphQueryNode,
    GraphSearchRow, Project, ProjectFilter, SamlProvider, SamlProviderSummary, TokenResponse,
    UpdateProjectInput, UpdateSamlProviderInput,
};
use super::pagination::{Connection, LIST_PAGE_SIZE};
use super::queries;
use crate::error::{ApiError, Error, Result};

/// Rate limit: 3 requests per second
const RATE_LIMIT_PER_SECOND: u32 = 3;

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Attempts after the first for transient failures
const MAX_RETRIES: u32 = 3;

/// First backoff delay; doubles on each retry
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Search results fetched when resolving cloud objects by ID
const CLOUD_SEARCH_PAGE_SIZE: usize = 20;

/// Which failures may be sent again
#[derive(Debug, Clone, Copy)]
enum Retry {
    /// Reads: any transient failure
    Transient,
    /// Mutations: only a 429, which the server rejects before applying anything
    RateLimitOnly,
}

impl Retry {
    fn allows(self, err: &ApiError) -> bool {
        match self {
            Retry::Transient => err.is_transient(),
            Retry::RateLimitOnly => matches!(err, ApiError::RateLimit(_)),
        }
    }
}

/// Service account credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Wiz API client
pub struct WizClient {
    http: HttpClient,
    api_url: String,
    auth_url: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    auth_state: Arc<RwLock<AuthState>>,
    retry_base_delay: Duration,
}

/// Internal authentication state
#[derive(Debug, Clone)]
struct AuthState {
    credentials: Option<Credentials>,
    token: Option<AccessToken>,
}

impl WizClient {
    /// Create a new client for a GraphQL endpoint and token endpoint
    pub fn new(
        api_url: impl Into<String>,
        auth_url: impl Into<String>,
        credentials: Option<Credentials>,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let quota =
            Quota::per_second(NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            http,
            api_url: api_url.into(),
            auth_url: auth_url.into(),
            rate_limiter,
            auth_state: Arc::new(RwLock::new(AuthState {
                credentials,
                token: None,
            })),
            retry_base_delay: RETRY_BASE_DELAY,
        })
    }

    /// Override the initial retry delay
    #[cfg(test)]
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Set the bearer token and expiry
    pub async fn set_token(&self, token: AccessToken) {
        self.auth_state.write().await.token = Some(token);
    }

    /// Current token, if one has been obtained
    #[cfg(test)]
    pub async fn current_token(&self) -> Option<AccessToken> {
        self.auth_state.read().await.token.clone()
    }

    /// Check if the token is missing or inside its refresh margin
    async fn is_token_expired(&self) -> bool {
        let state = self.auth_state.read().await;
        match &state.token {
            None => true,
            Some(token) => token.needs_refresh(Utc::now()),
        }
    }

    /// Request a new token with the stored credentials
    async fn refresh_token(&self) -> Result<()> {
        let credentials = {
            let state = self.auth_state.read().await;
            state.credentials.clone().ok_or(ApiError::Unauthorized)?
        };
        let token = self
            .authenticate(&credentials.client_id, &credentials.client_secret)
            .await?;
        self.set_token(token).await;
        Ok(())
    }

    /// Get the current token, refreshing if necessary
    async fn get_valid_token(&self) -> Result<String> {
        if self.is_token_expired().await {
            self.refresh_token().await?;
        }

        let state = self.auth_state.read().await;
        state
            .token
            .as_ref()
            .map(|token| token.token.clone())
            .ok_or(ApiError::Unauthorized.into())
    }

    /// Run a GraphQL query, retrying transient failures with backoff.
    async fn execute<T, V>(&self, query: &str, variables: &V) -> Result<T>
    where
        T: DeserializeOwned,
        V: Serialize + Sync,
    {
        self.send(query, variables, Retry::Transient).await
    }

    /// Run a GraphQL mutation.
    ///
    /// A gateway error may arrive after the change was committed, so only
    /// rate limiting is retried.
    async fn mutate<T, V>(&self, query: &str, variables: &V) -> Result<T>
    where
        T: DeserializeOwned,
        V: Serialize + Sync,
    {
        self.send(query, variables, Retry::RateLimitOnly).await
    }

    /// A 401 forces one token refresh before giving up.
    async fn send<T, V>(&self, query: &str, variables: &V, retry: Retry) -> Result<T>
    where
        T: DeserializeOwned,
        V: Serialize + Sync,
    {
        let mut attempt = 0u32;
        let mut refreshed = false;

        loop {
            match self.execute_once(query, variables).await {
                Err(Error::Api(ApiError::Unauthorized)) if !refreshed => {
                    debug!("Token rejected, requesting a new one");
                    refreshed = true;
                    self.refresh_token().await?;
                }
                Err(Error::Api(err)) if retry.allows(&err) && attempt < MAX_RETRIES => {
                    let mut delay = self.retry_base_delay * 2u32.pow(attempt);
                    if let ApiError::RateLimit(retry_after) = &err {
                        delay = delay.max(*retry_after);
                    }
                    attempt += 1;
                    warn!(
                        "{} - retrying in {:?} (attempt {}/{})",
                        err, delay, attempt, MAX_RETRIES
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }

    /// Single GraphQL round trip
    async fn execute_once<T, V>(&self, query: &str, variables: &V) -> Result<T>
    where
        T: DeserializeOwned,
        V: Serialize + Sync,
    {
        self.rate_limiter.until_ready().await;

        let token = self.get_valid_token().await?;

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(token)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        match status {
            StatusCode::OK => {
                let body = response.json::<GraphQlResponse<T>>().await.map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
                })?;
                body.into_result()
            }
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized.into()),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden.into()),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(0);
                Err(ApiError::RateLimit(Duration::from_secs(retry_after)).into())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg).into())
            }
            StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => Err(ApiError::ServerError(status.to_string()).into()),
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                // Only gateway errors are worth retrying
                Err(ApiError::InvalidResponse(format!("{}: {}", status, error_msg)).into())
            }
            _ => {
                let error_msg = format!("Unexpected status code: {}", status);
                Err(ApiError::InvalidResponse(error_msg).into())
            }
        }
    }
}

#[async_trait]
impl AuthApi for WizClient {
    async fn authenticate(&self, client_id: &str, client_secret: &str) -> Result<AccessToken> {
        self.rate_limiter.until_ready().await;

        let form = [
            ("grant_type", "client_credentials"),
            ("audience", "wiz-api"),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ];

        let response = self
            .http
            .post(&self.auth_url)
            .form(&form)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        if status != StatusCode::OK {
            return Err(ApiError::AuthFailed {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|_| ApiError::InvalidResponse("Could not parse API response".to_string()))?;

        let token = parsed.access_token.filter(|t| !t.is_empty()).ok_or_else(|| {
            ApiError::InvalidResponse(format!(
                "Could not retrieve token from Wiz: {}",
                parsed.message.as_deref().unwrap_or("no message")
            ))
        })?;

        // Tokens without a lifetime are treated as valid for an hour
        let issued_at = Utc::now();
        let expires_at = issued_at + chrono::Duration::seconds(parsed.expires_in.unwrap_or(3600));

        debug!("Obtained access token valid until {}", expires_at);
        Ok(AccessToken {
            token,
            expires_at,
            issued_at: Some(issued_at),
        })
    }
}

#[async_trait]
impl GraphApi for WizClient {
    async fn graph_search(
        &self,
        query: &GraphQueryNode,
        first: usize,
        after: Option<String>,
    ) -> Result<Connection<GraphSearchRow>> {
        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            graph_search: Connection<GraphSearchRow>,
        }

        let variables = json!({
            "query": query,
            "projectId": "*",
            "first": first,
            "after": after,
            "quick": false,
        });
        let data: Data = self.execute(queries::GRAPH_SEARCH, &variables).await?;
        Ok(data.graph_search)
    }
}

#[async_trait]
impl ProjectApi for WizClient {
    async fn list_projects(
        &self,
        filter: &ProjectFilter,
        first: usize,
        after: Option<String>,
    ) -> Result<Connection<Project>> {
        #[derive(serde::Deserialize)]
        struct Data {
            projects: Connection<Project>,
        }

        let variables = json!({
            "filterBy": filter,
            "first": first,
            "after": after,
            "orderBy": {"field": "NAME", "direction": "ASC"},
        });
        let data: Data = self.execute(queries::PROJECTS_TABLE, &variables).await?;
        Ok(data.projects)
    }

    async fn search_cloud_accounts(&self, search: &str) -> Result<Vec<CloudAccount>> {
        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            cloud_accounts: Connection<CloudAccount>,
        }

        let variables = json!({
            "first": CLOUD_SEARCH_PAGE_SIZE,
            "filterBy": {"search": [search]},
        });
        let data: Data = self.execute(queries::CLOUD_ACCOUNTS_PAGE, &variables).await?;
        Ok(data.cloud_accounts.nodes)
    }

    async fn search_cloud_organizations(&self, search: &str) -> Result<Vec<CloudOrganization>> {
        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            cloud_organizations: Connection<CloudOrganization>,
        }

        let variables = json!({
            "first": CLOUD_SEARCH_PAGE_SIZE,
            "filterBy": {"search": [search]},
        });
        let data: Data = self.execute(queries::CLOUD_ORGANIZATIONS, &variables).await?;
        Ok(data.cloud_organizations.nodes)
    }

    async fn create_project(&self, input: &CreateProjectInput) -> Result<String> {
        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            create_project: Payload,
        }

        #[derive(serde::Deserialize)]
        struct Payload {
            project: super::models::ProjectRef,
        }

        let variables = json!({ "input": input });
        let data: Data = self.mutate(queries::CREATE_PROJECT, &variables).await?;
        Ok(data.create_project.project.id)
    }

    async fn update_project(&self, input: &UpdateProjectInput) -> Result<String> {
        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            update_project: Payload,
        }

        #[derive(serde::Deserialize)]
        struct Payload {
            project: super::models::ProjectRef,
        }

        let variables = json!({ "input": input });
        let data: Data = self.mutate(queries::UPDATE_PROJECT, &variables).await?;
        Ok(data.update_project.project.id)
    }
}

#[async_trait]
impl SamlApi for WizClient {
    async fn list_saml_providers(&self) -> Result<Vec<SamlProviderSummary>> {
        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            saml_identity_providers: Connection<SamlProviderSummary>,
        }

        let collected = super::pagination::collect_pages(None, |after| async move {
            let variables = json!({
                "first": LIST_PAGE_SIZE,
                "after": after,
                "filterBy": {"source": "MODERN"},
            });
            let data: Data = self
                .execute(queries::SAML_IDENTITY_PROVIDERS_TABLE, &variables)
                .await?;
            Ok(data.saml_identity_providers)
        })
        .await?;
        Ok(collected.items)
    }

    async fn get_saml_provider(&self, id: &str) -> Result<SamlProvider> {
        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            saml_identity_provider: Option<SamlProvider>,
        }

        let variables = json!({ "id": id });
        let data: Data = self
            .execute(queries::LOAD_SAML_IDENTITY_PROVIDER, &variables)
            .await?;
        data.saml_identity_provider.ok_or_else(|| {
            ApiError::InvalidResponse(format!("identity provider {} not found", id)).into()
        })
    }

    async fn update_saml_provider(&self, input: &UpdateSamlProviderInput) -> Result<()> {
        let variables = json!({ "input": input });
        let _: serde_json::Value = self
            .mutate(queries::UPDATE_SAML_IDENTITY_PROVIDER, &variables)
            .await?;
        Ok(())
    }
}

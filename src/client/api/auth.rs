//! Authentication API trait

use async_trait::async_trait;

use crate::client::models::AccessToken;
use crate::error::Result;

/// Authentication operations for the Wiz API
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange service account credentials for a bearer token
    async fn authenticate(&self, client_id: &str, client_secret: &str) -> Result<AccessToken>;
}

//! GraphQL request/response envelope

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// POST body of a GraphQL request
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: &'a V,
}

/// Response body; `errors` may accompany partial `data`
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,

    #[serde(default)]
    pub errors: Option<Vec<GraphQlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlErrorEntry {
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    /// Treat any reported error as a failure, otherwise return the data.
    pub fn into_result(self) -> Result<T> {
        if let Some(errors) = self.errors.filter(|e| !e.is_empty()) {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ApiError::GraphQl(message).into());
        }

        self.data
            .ok_or_else(|| ApiError::InvalidResponse("response has no data".to_string()).into())
    }
}

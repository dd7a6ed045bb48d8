//! Wiz GraphQL API client

pub mod api;
pub mod graphql;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod pagination;
pub mod queries;
pub mod wiz;

pub use api::{AuthApi, GraphApi, ProjectApi, SamlApi};
#[cfg(test)]
pub use mock::MockWizClient;
pub use wiz::{Credentials, WizClient};

/// Wiz API client trait
///
/// Combines every sub-trait so command code can take a single
/// `&dyn WizApi` (or generic `C: WizApi`) and reach any endpoint.
pub trait WizApi: AuthApi + GraphApi + ProjectApi + SamlApi {}

impl<T> WizApi for T where T: AuthApi + GraphApi + ProjectApi + SamlApi {}

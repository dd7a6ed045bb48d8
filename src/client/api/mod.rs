//! API trait definitions split by responsibility
//!
//! This module organizes the Wiz API surface into focused sub-traits:
//! - [`AuthApi`] - Token acquisition
//! - [`GraphApi`] - Security graph search
//! - [`ProjectApi`] - Projects and the cloud objects they link to
//! - [`SamlApi`] - SAML identity provider settings
//!
//! The [`WizApi`](super::WizApi) super-trait combines all four.

mod auth;
mod graph;
mod projects;
mod saml;

pub use auth::AuthApi;
pub use graph::GraphApi;
pub use projects::ProjectApi;
pub use saml::SamlApi;

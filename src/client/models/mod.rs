//! Wiz API data models
//!
//! This module contains the request and response types exchanged with the
//! GraphQL API, organized by resource type.

mod auth;
mod cloud;
mod graph;
mod project;
mod saml;

pub use auth::{AccessToken, TokenResponse, needs_refresh};
pub use cloud::{CloudAccount, CloudOrganization};
pub use graph::{GraphEntity, GraphQueryNode, GraphRelationship, GraphSearchRow};
pub use project::{
    CloudAccountLinkInput, CloudOrganizationLinkInput, CreateProjectInput, Project, ProjectFilter,
    ProjectPatch, ProjectRef, UpdateProjectInput,
};
pub use saml::{
    GroupMappingInput, SamlProvider, SamlProviderPatch, SamlProviderSummary,
    UpdateSamlProviderInput,
};

#[cfg(test)]
pub use project::{CloudAccountLink, CloudOrganizationLink, LinkedObject};
#[cfg(test)]
pub use saml::{GroupMapping, GroupMappingProject, GroupMappingRole};

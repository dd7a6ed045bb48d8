//! Display model implementations for table and JSON output

mod common;
mod member;
mod project;
mod saml;

pub use member::MemberDisplay;
pub use project::{ArchiveDisplay, NodeDisplay, ProjectResultDisplay};
pub use saml::{GroupDisplay, MappingDisplay, ProviderDisplay};

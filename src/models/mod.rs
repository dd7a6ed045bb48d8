//! Display models for CLI output
//!
//! Planning and API types are converted into these rows for table and JSON
//! output, so column names live in one place.

pub mod display;

pub use display::{
    ArchiveDisplay, GroupDisplay, MappingDisplay, MemberDisplay, NodeDisplay, ProjectResultDisplay,
    ProviderDisplay,
};

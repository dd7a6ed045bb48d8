//! Planning logic shared by the bulk commands
//!
//! Nothing here talks to stdout; commands decide what to print and whether
//! planned writes are applied.

pub mod archive;
pub mod links;
pub mod members;
pub mod saml;

pub use archive::{
    ArchiveSettings, PlannedUpdate, ProjectTree, apply_archive, plan_archive, pull_project_tree,
};
pub use links::plan_project_update;
pub use members::{Member, fetch_members};
pub use saml::{
    AdGroupRow, GroupSummary, MappingMerge, MappingRow, aggregate_ad_groups, is_project_role,
    merge_group_mappings, resolve_project_id, validate_rows,
};

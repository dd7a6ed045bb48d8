//! Project display models

use serde::Serialize;
use tabled::Tabled;

use super::common::opt_cell;
use crate::hierarchy::{CreatedNode, NodeKind};
use crate::sync::PlannedUpdate;

/// Modelled folder or project
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct NodeDisplay {
    #[tabled(rename = "PATH")]
    pub path: String,

    #[tabled(rename = "TYPE")]
    #[serde(rename = "type")]
    pub kind: String,

    #[tabled(rename = "EXTERNAL ID")]
    pub external_id: String,

    #[tabled(rename = "PARENT")]
    pub parent: String,

    #[tabled(rename = "DEPTH")]
    pub depth: usize,
}

impl From<&CreatedNode> for NodeDisplay {
    fn from(node: &CreatedNode) -> Self {
        Self {
            path: node.path.clone(),
            kind: match node.kind {
                NodeKind::Folder => "folder".to_string(),
                NodeKind::Project => "project".to_string(),
            },
            external_id: opt_cell(node.external_id.as_deref()),
            parent: opt_cell(node.parent_name.as_deref()),
            depth: node.depth,
        }
    }
}

/// Outcome of one `create-projects` row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ProjectResultDisplay {
    #[tabled(rename = "ACTION")]
    pub action: String,

    #[tabled(rename = "PROJECT ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "FOLDER")]
    pub is_folder: bool,

    #[tabled(rename = "DETAIL")]
    pub detail: String,
}

/// Planned rename/archive of one project
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ArchiveDisplay {
    #[tabled(rename = "PROJECT ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "NEW NAME")]
    pub new_name: String,

    #[tabled(rename = "NEW SLUG")]
    pub new_slug: String,

    #[tabled(rename = "ARCHIVED")]
    pub archived: String,
}

impl From<&PlannedUpdate> for ArchiveDisplay {
    fn from(update: &PlannedUpdate) -> Self {
        let patch = &update.input.patch;
        Self {
            id: update.input.id.clone(),
            name: update.current_name.clone(),
            new_name: patch
                .name
                .clone()
                .unwrap_or_else(|| update.current_name.clone()),
            new_slug: opt_cell(patch.slug.as_deref().or(update.current_slug.as_deref())),
            archived: match patch.archived {
                Some(target) => format!("{} -> {}", update.currently_archived, target),
                None => update.currently_archived.to_string(),
            },
        }
    }
}

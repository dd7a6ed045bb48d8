//! CSV files read and written by the bulk commands
//!
//! Column layouts are fixed; readers skip the header line and address
//! columns by position, treating missing trailing columns as empty.

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, Writer, WriterBuilder};
use log::debug;

use crate::error::Result;
use crate::hierarchy::CreatedNode;
use crate::sync::{AdGroupRow, GroupSummary, MappingRow};

pub const PROJECTS_HEADER: [&str; 8] = [
    "wiz-project-name",
    "isFolder",
    "cloudAccountLinks",
    "cloudOrganizationLinks",
    "parentProjectName",
    "Full Path",
    "Path Depth",
    "Cloud",
];

pub const AD_GROUPS_HEADER: [&str; 5] = [
    "Group Name",
    "Wiz Project",
    "Member Name",
    "Member UPN/Email",
    "Originating Cloud",
];

pub const CREATED_PROJECTS_HEADER: [&str; 3] = ["Project ID", " Project Name", " Is Folder"];

pub const SAML_MAPPINGS_HEADER: [&str; 3] = ["SAML Group Name", "Permissions", "Project Name"];

/// Python-style boolean cell
fn bool_cell(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Split a comma list cell, dropping blanks.
///
/// The cell is itself a CSV record, so a quoted name may hold a comma.
pub fn split_list(cell: &str) -> Vec<String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(cell.as_bytes());
    reader
        .records()
        .flatten()
        .flat_map(|record| record.iter().map(str::to_string).collect::<Vec<_>>())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Join names into one list cell; the inverse of [`split_list`].
pub fn join_list(names: &[String]) -> Result<String> {
    if names.is_empty() {
        return Ok(String::new());
    }
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(names)?;
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).trim_end().to_string())
}

fn cell(record: &StringRecord, index: usize) -> String {
    record.get(index).unwrap_or("").trim().to_string()
}

/// Truncate `path` and write `header`.
fn create_with_header(path: &Path, header: &[&str]) -> Result<Writer<File>> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(header)?;
    writer.flush()?;
    Ok(writer)
}

fn read_records(path: &Path) -> Result<Vec<StringRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
    debug!("Read {} rows from {}", records.len(), path.display());
    Ok(records)
}

// ============================================================================
// Projects plan file
// ============================================================================

/// Projects file produced by `plan` and consumed by `create-projects`
pub struct ProjectsCsv {
    writer: Writer<File>,
    rows: usize,
}

impl ProjectsCsv {
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self {
            writer: create_with_header(path, &PROJECTS_HEADER)?,
            rows: 0,
        })
    }

    /// Row for a per-cloud root folder: no parent, depth 1.
    pub fn write_root(&mut self, name: &str, cloud: &str) -> Result<()> {
        self.writer
            .write_record([name, bool_cell(true), "", "", "", name, "1", cloud])?;
        self.rows += 1;
        Ok(())
    }

    pub fn write_node(&mut self, node: &CreatedNode) -> Result<()> {
        let external_id = node.external_id.as_deref().unwrap_or("");
        let (account, organization) = if node.kind.is_folder() {
            ("", external_id)
        } else {
            (external_id, "")
        };
        let depth = node.depth.to_string();
        let cloud = node.cloud.map(|c| c.to_string()).unwrap_or_default();

        self.writer.write_record([
            node.name.as_str(),
            bool_cell(node.kind.is_folder()),
            account,
            organization,
            node.parent_name.as_deref().unwrap_or(""),
            node.path.as_str(),
            depth.as_str(),
            cloud.as_str(),
        ])?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Row of the projects file as `create-projects` reads it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInputRow {
    pub name: String,
    pub is_folder: bool,
    pub account_ids: Vec<String>,
    pub organization_ids: Vec<String>,
    pub parent_name: Option<String>,
}

pub fn read_project_rows(path: &Path) -> Result<Vec<ProjectInputRow>> {
    Ok(read_records(path)?
        .iter()
        .filter(|r| !cell(r, 0).is_empty())
        .map(|r| {
            let parent = cell(r, 4);
            ProjectInputRow {
                name: cell(r, 0),
                is_folder: cell(r, 1).eq_ignore_ascii_case("true"),
                account_ids: split_list(&cell(r, 2)),
                organization_ids: split_list(&cell(r, 3)),
                parent_name: (!parent.is_empty()).then_some(parent),
            }
        })
        .collect())
}

// ============================================================================
// AD groups file
// ============================================================================

/// AD groups file: one row per group member
pub struct AdGroupsCsv {
    writer: Writer<File>,
    rows: usize,
}

impl AdGroupsCsv {
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self {
            writer: create_with_header(path, &AD_GROUPS_HEADER)?,
            rows: 0,
        })
    }

    pub fn write_member(&mut self, row: &AdGroupRow) -> Result<()> {
        self.writer.write_record([
            &row.group,
            &row.project,
            &row.member_name,
            &row.member_email,
            &row.cloud,
        ])?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

pub fn read_ad_group_rows(path: &Path) -> Result<Vec<AdGroupRow>> {
    Ok(read_records(path)?
        .iter()
        .filter(|r| !cell(r, 0).is_empty())
        .map(|r| AdGroupRow {
            group: cell(r, 0),
            project: cell(r, 1),
            member_name: cell(r, 2),
            member_email: cell(r, 3),
            cloud: cell(r, 4),
        })
        .collect())
}

// ============================================================================
// create-projects output
// ============================================================================

pub struct CreatedProjectsCsv {
    writer: Writer<File>,
}

impl CreatedProjectsCsv {
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self {
            writer: create_with_header(path, &CREATED_PROJECTS_HEADER)?,
        })
    }

    /// `id` is empty for projects that were only planned.
    pub fn write(&mut self, id: &str, name: &str, is_folder: bool) -> Result<()> {
        self.writer.write_record([id, name, bool_cell(is_folder)])?;
        self.writer.flush()?;
        Ok(())
    }
}

// ============================================================================
// SAML mappings file
// ============================================================================

/// Write one mapping row per group, projects joined by commas.
pub fn write_saml_mappings(path: &Path, groups: &[GroupSummary], role: &str) -> Result<()> {
    let mut writer = create_with_header(path, &SAML_MAPPINGS_HEADER)?;
    for group in groups {
        let projects = join_list(&group.projects)?;
        writer.write_record([group.group.as_str(), role, projects.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_mapping_rows(path: &Path) -> Result<Vec<MappingRow>> {
    Ok(read_records(path)?
        .iter()
        .filter(|r| !cell(r, 0).is_empty())
        .map(|r| MappingRow {
            group: cell(r, 0),
            role: cell(r, 1),
            projects: split_list(&cell(r, 2)),
        })
        .collect())
}

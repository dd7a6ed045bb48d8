//! Project tree with find-or-create insertion

use serde::Serialize;

use super::Cloud;

/// Folder project or leaf project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Folder,
    Project,
}

impl NodeKind {
    pub fn is_folder(&self) -> bool {
        matches!(self, NodeKind::Folder)
    }
}

/// Node of the modelled project hierarchy.
///
/// Children are kept in insertion order and are unique by name within
/// `folders` and within `projects`. Leaf projects never have children.
#[derive(Debug, Clone)]
pub struct ProjectNode {
    pub external_id: Option<String>,
    pub name: String,
    pub path: String,
    pub parent_name: Option<String>,
    pub cloud: Option<Cloud>,
    pub kind: NodeKind,
    folders: Vec<ProjectNode>,
    projects: Vec<ProjectNode>,
}

/// Summary of a node added to the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedNode {
    pub name: String,
    pub kind: NodeKind,
    pub external_id: Option<String>,
    pub path: String,
    pub parent_name: Option<String>,
    pub depth: usize,
    pub cloud: Option<Cloud>,
}

/// Outcome of a find-or-create
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// A new node was added
    Created(CreatedNode),
    /// A node of that name already exists at the target
    Existing,
    /// An ancestor is missing from the tree; nothing was added
    Orphaned,
}

impl ProjectNode {
    /// Top-level folder, e.g. the per-cloud root project.
    pub fn root_folder(name: impl Into<String>, cloud: Option<Cloud>) -> Self {
        let name = name.into();
        Self {
            external_id: None,
            path: name.clone(),
            name,
            parent_name: None,
            cloud,
            kind: NodeKind::Folder,
            folders: Vec::new(),
            projects: Vec::new(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }

    pub fn folders(&self) -> &[ProjectNode] {
        &self.folders
    }

    pub fn projects(&self) -> &[ProjectNode] {
        &self.projects
    }

    /// Number of path components.
    pub fn depth(&self) -> usize {
        self.path.split('/').count()
    }

    pub fn summary(&self) -> CreatedNode {
        CreatedNode {
            name: self.name.clone(),
            kind: self.kind,
            external_id: self.external_id.clone(),
            path: self.path.clone(),
            parent_name: self.parent_name.clone(),
            depth: self.depth(),
            cloud: self.cloud,
        }
    }

    /// Insert a folder at the end of `lineage`, one name per level below this node.
    pub fn find_or_create_folder(
        &mut self,
        lineage: &[String],
        external_id: Option<&str>,
        path: &str,
    ) -> Insertion {
        self.find_or_create(lineage, external_id, path, NodeKind::Folder)
    }

    /// Insert a leaf project at the end of `lineage`.
    pub fn find_or_create_project(
        &mut self,
        lineage: &[String],
        external_id: Option<&str>,
        path: &str,
    ) -> Insertion {
        self.find_or_create(lineage, external_id, path, NodeKind::Project)
    }

    fn find_or_create(
        &mut self,
        lineage: &[String],
        external_id: Option<&str>,
        path: &str,
        kind: NodeKind,
    ) -> Insertion {
        if !self.is_folder() {
            return Insertion::Orphaned;
        }

        match lineage {
            [] => Insertion::Orphaned,
            [target] => {
                let cloud = self.cloud;
                let parent_name = self.name.clone();
                let siblings = match kind {
                    NodeKind::Folder => &mut self.folders,
                    NodeKind::Project => &mut self.projects,
                };
                if siblings.iter().any(|n| &n.name == target) {
                    return Insertion::Existing;
                }

                let node = ProjectNode {
                    external_id: external_id.map(str::to_string),
                    name: target.clone(),
                    path: path.to_string(),
                    parent_name: Some(parent_name),
                    cloud,
                    kind,
                    folders: Vec::new(),
                    projects: Vec::new(),
                };
                let summary = node.summary();
                siblings.push(node);
                Insertion::Created(summary)
            }
            [next, rest @ ..] => match self.folders.iter_mut().find(|n| &n.name == next) {
                Some(folder) => folder.find_or_create(rest, external_id, path, kind),
                None => Insertion::Orphaned,
            },
        }
    }

    /// Depth-first listing: this node, its projects, then each child folder's listing.
    pub fn walk(&self) -> Vec<&ProjectNode> {
        let mut out = Vec::new();
        self.walk_into(&mut out);
        out
    }

    fn walk_into<'a>(&'a self, out: &mut Vec<&'a ProjectNode>) {
        out.push(self);
        out.extend(self.projects.iter());
        for folder in &self.folders {
            folder.walk_into(out);
        }
    }

    /// Count folders and projects below this node.
    pub fn count(&self) -> (usize, usize) {
        let mut folders = 0;
        let mut projects = self.projects.len();
        for folder in &self.folders {
            let (f, p) = folder.count();
            folders += f + 1;
            projects += p;
        }
        (folders, projects)
    }
}

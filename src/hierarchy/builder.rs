//! Row walker: graph search rows into a project tree

use log::{debug, warn};

use super::matrix::{EntityKind, EntityMatrix};
use super::tree::{CreatedNode, Insertion, ProjectNode};
use super::sanitize_name;
use crate::client::models::{GraphEntity, GraphSearchRow};

/// Walks graph rows positionally and inserts each entity into a tree.
pub struct RowWalker<'a> {
    matrix: &'a EntityMatrix,
    friendly_name: &'a str,
    burners: &'a [String],
}

impl<'a> RowWalker<'a> {
    /// `friendly_name` replaces the graph name of the entity at position 0.
    /// Like graph names, it may not contain `/`.
    pub fn new(matrix: &'a EntityMatrix, friendly_name: &'a str) -> Self {
        Self {
            matrix,
            friendly_name,
            burners: &[],
        }
    }

    /// Exclude the subtrees rooted at these external IDs.
    pub fn with_burners(mut self, burners: &'a [String]) -> Self {
        self.burners = burners;
        self
    }

    /// Insert every row into `tree`; returns the nodes created, in order.
    pub fn build(&self, tree: &mut ProjectNode, rows: &[GraphSearchRow]) -> Vec<CreatedNode> {
        let mut created = Vec::new();
        for (n, row) in rows.iter().enumerate() {
            debug!("Processing result {} of {}", n + 1, rows.len());
            created.extend(self.walk_row(tree, row));
        }
        created
    }

    /// Insert the entities of one row.
    pub fn walk_row(&self, tree: &mut ProjectNode, row: &GraphSearchRow) -> Vec<CreatedNode> {
        let mut created = Vec::new();

        for (index, entity) in row.entities.iter().enumerate() {
            let Some(entity) = entity else { continue };

            let kind = match self.matrix.kind(index) {
                Ok(kind) => kind,
                Err(_) => {
                    warn!(
                        "Row has an entity at position {} beyond the {}-slot matrix; skipping '{}'",
                        index,
                        self.matrix.len(),
                        entity.name
                    );
                    continue;
                }
            };

            // Positions are validated above, so lineage cannot fail here
            let Ok(lineage) = self.matrix.lineage(index) else {
                continue;
            };

            if let Some(burner) = self.burner_in(&row.entities, &lineage) {
                debug!("Skipping '{}' below excluded group {}", entity.name, burner);
                continue;
            }

            let Some(names) = self.lineage_names(&row.entities, &lineage) else {
                warn!(
                    "Row is missing an ancestor of '{}' at position {}; skipping",
                    entity.name, index
                );
                continue;
            };

            let path = format!("{}/{}", tree.name, names.join("/"));
            let external_id = entity.external_id();

            let outcome = match kind {
                EntityKind::CloudOrganization => {
                    tree.find_or_create_folder(&names, external_id, &path)
                }
                EntityKind::Subscription => {
                    tree.find_or_create_project(&names, external_id, &path)
                }
            };

            match outcome {
                Insertion::Created(node) => {
                    debug!("Modelled {:?} {}", node.kind, node.path);
                    created.push(node);
                }
                Insertion::Existing => {}
                Insertion::Orphaned => {
                    warn!("No parent folder in the tree for {}; skipping", path);
                }
            }
        }

        created
    }

    /// First burner external ID found among the entity's ancestors or itself.
    fn burner_in<'r>(
        &self,
        entities: &'r [Option<GraphEntity>],
        lineage: &[usize],
    ) -> Option<&'r str> {
        if self.burners.is_empty() {
            return None;
        }
        lineage
            .iter()
            .filter_map(|&i| entities.get(i).and_then(Option::as_ref))
            .filter_map(GraphEntity::external_id)
            .find(|id| self.burners.iter().any(|b| b == id))
    }

    fn lineage_names(
        &self,
        entities: &[Option<GraphEntity>],
        lineage: &[usize],
    ) -> Option<Vec<String>> {
        lineage
            .iter()
            .map(|&i| {
                if i == 0 {
                    Some(sanitize_name(self.friendly_name))
                } else {
                    entities
                        .get(i)
                        .and_then(Option::as_ref)
                        .map(|e| sanitize_name(&e.name))
                }
            })
            .collect()
    }
}

//! Entity matrices: row position to entity kind and parent position

use crate::error::{Error, Result};

/// Kind of entity at a row position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum EntityKind {
    /// Management group, AWS OU, GCP folder; modelled as a folder project
    #[value(name = "organization")]
    CloudOrganization,
    /// Subscription, AWS account, GCP project; modelled as a leaf project
    #[value(name = "subscription")]
    Subscription,
}

impl EntityKind {
    /// Graph entity type name.
    pub fn graph_type(&self) -> &'static str {
        match self {
            EntityKind::CloudOrganization => "CLOUD_ORGANIZATION",
            EntityKind::Subscription => "SUBSCRIPTION",
        }
    }
}

/// One row position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySlot {
    pub index: usize,
    pub kind: EntityKind,
    pub parent: Option<usize>,
}

/// Fixed mapping from row position to entity kind and parent position.
///
/// Slot order is the depth-first pre-order of the graph query built from the
/// matrix, which is also the order entities appear in a returned row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMatrix {
    slots: Vec<EntitySlot>,
}

use EntityKind::{CloudOrganization as Org, Subscription as Sub};

impl EntityMatrix {
    /// Build a matrix from `(kind, parent)` pairs in slot order.
    pub fn from_parents(entries: &[(EntityKind, Option<usize>)]) -> Self {
        let slots = entries
            .iter()
            .enumerate()
            .map(|(index, &(kind, parent))| EntitySlot {
                index,
                kind,
                parent,
            })
            .collect();
        Self { slots }
    }

    /// Two levels of groups below the root, used for folder-structure runs.
    pub fn basic() -> Self {
        Self::from_parents(&[
            (Org, None),
            (Org, Some(0)),
            (Sub, Some(1)),
            (Org, Some(1)),
            (Sub, Some(3)),
            (Sub, Some(0)),
        ])
    }

    /// Six levels of management groups below the root.
    pub fn azure() -> Self {
        Self::from_parents(&[
            (Org, None),
            (Org, Some(0)),
            (Sub, Some(1)),
            (Org, Some(1)),
            (Sub, Some(3)),
            (Org, Some(3)),
            (Sub, Some(5)),
            (Org, Some(5)),
            (Org, Some(7)),
            (Org, Some(8)),
            (Sub, Some(9)),
            (Sub, Some(8)),
            (Sub, Some(7)),
            (Sub, Some(0)),
        ])
    }

    /// Same depth as Azure.
    pub fn aws() -> Self {
        Self::azure()
    }

    /// Four levels of folders below the organization.
    pub fn gcp() -> Self {
        Self::from_parents(&[
            (Org, None),
            (Org, Some(0)),
            (Sub, Some(1)),
            (Org, Some(1)),
            (Sub, Some(3)),
            (Org, Some(3)),
            (Sub, Some(5)),
            (Org, Some(5)),
            (Sub, Some(7)),
            (Sub, Some(0)),
        ])
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<&EntitySlot> {
        self.slots.get(index)
    }

    /// Entity kind at a row position.
    pub fn kind(&self, index: usize) -> Result<EntityKind> {
        self.slot(index)
            .map(|s| s.kind)
            .ok_or_else(|| out_of_range(index))
    }

    /// Positions from the root down to `index`, inclusive.
    pub fn lineage(&self, index: usize) -> Result<Vec<usize>> {
        let mut lineage = vec![index];
        let mut current = self.slot(index).ok_or_else(|| out_of_range(index))?;

        while let Some(parent) = current.parent {
            // Parents precede children; anything else would loop
            if parent >= current.index {
                return Err(Error::Input(format!(
                    "entity matrix slot {} has parent {} that does not precede it",
                    current.index, parent
                )));
            }
            lineage.push(parent);
            current = self.slot(parent).ok_or_else(|| out_of_range(parent))?;
        }

        lineage.reverse();
        Ok(lineage)
    }

    /// Direct children of a position, in slot order.
    pub fn children(&self, index: usize) -> impl Iterator<Item = &EntitySlot> + '_ {
        self.slots
            .iter()
            .filter(move |slot| slot.parent == Some(index))
    }
}

fn out_of_range(index: usize) -> Error {
    Error::Input(format!("entity index {} is outside the entity matrix", index))
}

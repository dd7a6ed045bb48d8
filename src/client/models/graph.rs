//! Security graph models
//!
//! Graph search returns rows of entities. The position of each entity in a row
//! is fixed by the shape of the query, which is what the hierarchy walker
//! relies on.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Single entity in a graph search row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEntity {
    /// Graph entity ID
    pub id: String,

    /// Display name
    pub name: String,

    /// Entity type (e.g. `CLOUD_ORGANIZATION`, `SUBSCRIPTION`, `USER_ACCOUNT`)
    #[serde(rename = "type")]
    pub entity_type: String,

    /// Free-form entity properties
    #[serde(default)]
    pub properties: Value,
}

impl GraphEntity {
    /// Read a string property.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Cloud provider identifier of the entity (management group ID, subscription ID, ...).
    pub fn external_id(&self) -> Option<&str> {
        self.property("externalId")
    }
}

/// One row of a graph search result; unmatched optional positions are null
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSearchRow {
    #[serde(default)]
    pub entities: Vec<Option<GraphEntity>>,
}

/// Node of a `GraphEntityQueryInput` tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQueryNode {
    #[serde(rename = "type")]
    pub entity_types: Vec<String>,

    pub select: bool,

    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<GraphRelationship>,
}

impl GraphQueryNode {
    /// Create a node matching one entity type.
    pub fn new(entity_type: &str) -> Self {
        Self {
            entity_types: vec![entity_type.to_string()],
            select: false,
            filter: None,
            relationships: Vec::new(),
        }
    }

    /// Include this node's entity in result rows.
    pub fn selected(mut self) -> Self {
        self.select = true;
        self
    }

    /// Add an `EQUALS` condition on a property.
    pub fn where_equals(mut self, property: &str, values: &[&str]) -> Self {
        let filter = self.filter.get_or_insert_with(|| Value::Object(Default::default()));
        if let Value::Object(map) = filter {
            map.insert(
                property.to_string(),
                serde_json::json!({ "EQUALS": values }),
            );
        }
        self
    }

    /// Attach a related node.
    pub fn relate(mut self, relationship: GraphRelationship) -> Self {
        self.relationships.push(relationship);
        self
    }
}

/// Edge between two query nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphRelationship {
    #[serde(rename = "type")]
    pub relationship_types: Vec<RelationshipType>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,

    #[serde(rename = "with")]
    pub target: GraphQueryNode,
}

impl GraphRelationship {
    /// Required relationship of one type.
    pub fn new(relationship_type: &str, target: GraphQueryNode) -> Self {
        Self {
            relationship_types: vec![RelationshipType {
                relationship_type: relationship_type.to_string(),
                reverse: false,
            }],
            optional: false,
            target,
        }
    }

    /// Follow the relationship in the reverse direction.
    pub fn reversed(mut self) -> Self {
        for rt in &mut self.relationship_types {
            rt.reverse = true;
        }
        self
    }

    /// Keep rows where the related entity is absent.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Relationship type selector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipType {
    #[serde(rename = "type")]
    pub relationship_type: String,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub reverse: bool,
}

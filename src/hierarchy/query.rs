//! Graph queries derived from entity matrices

use super::Cloud;
use super::matrix::{EntityKind, EntityMatrix};
use crate::client::models::{GraphQueryNode, GraphRelationship};

/// Hierarchy query below a root organization.
///
/// Every matrix slot becomes a selected node; children hang off their parent
/// through optional `CONTAINS` edges so shallow branches still produce rows.
pub fn hierarchy_query(matrix: &EntityMatrix, root_external_id: &str) -> GraphQueryNode {
    node_for(matrix, 0).where_equals("externalId", &[root_external_id])
}

fn node_for(matrix: &EntityMatrix, index: usize) -> GraphQueryNode {
    let kind = matrix
        .slot(index)
        .map(|s| s.kind)
        .unwrap_or(EntityKind::CloudOrganization);

    matrix
        .children(index)
        .fold(GraphQueryNode::new(kind.graph_type()).selected(), |node, child| {
            node.relate(GraphRelationship::new("CONTAINS", node_for(matrix, child.index)).optional())
        })
}

/// Users holding a role binding on one subscription or organization.
///
/// The user is the only selected node, so each row's first entity is the member.
pub fn member_query(scope_external_id: &str, kind: EntityKind, cloud: Cloud) -> GraphQueryNode {
    let scope = GraphQueryNode::new(kind.graph_type())
        .where_equals("externalId", &[scope_external_id])
        .where_equals("cloudPlatform", &[cloud.platform()]);

    let binding = GraphQueryNode::new("ACCESS_ROLE_BINDING")
        .relate(GraphRelationship::new("APPLIES_TO", scope));

    GraphQueryNode::new("USER_ACCOUNT")
        .selected()
        .relate(GraphRelationship::new("ASSIGNED_TO", binding).reversed())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected_types(node: &GraphQueryNode, out: &mut Vec<String>) {
        if node.select {
            out.push(node.entity_types[0].clone());
        }
        for rel in &node.relationships {
            selected_types(&rel.target, out);
        }
    }

    #[test]
    fn test_hierarchy_query_matches_matrix_order() {
        let matrix = EntityMatrix::azure();
        let query = hierarchy_query(&matrix, "mg-root");

        let mut types = Vec::new();
        selected_types(&query, &mut types);
        let expected: Vec<String> = (0..matrix.len())
            .map(|i| matrix.kind(i).unwrap().graph_type().to_string())
            .collect();
        assert_eq!(types, expected);
    }

    #[test]
    fn test_hierarchy_query_root_filter_and_optional_edges() {
        let query = hierarchy_query(&EntityMatrix::basic(), "mg-root");
        let json = serde_json::to_value(&query).unwrap();

        assert_eq!(json["type"][0], "CLOUD_ORGANIZATION");
        assert_eq!(json["where"]["externalId"]["EQUALS"][0], "mg-root");
        assert_eq!(json["relationships"].as_array().unwrap().len(), 2);
        assert_eq!(json["relationships"][0]["optional"], true);
        assert_eq!(json["relationships"][0]["type"][0]["type"], "CONTAINS");
        assert_eq!(json["relationships"][1]["with"]["type"][0], "SUBSCRIPTION");
        // Only the root is filtered
        assert!(json["relationships"][0]["with"].get("where").is_none());
    }

    #[test]
    fn test_member_query_shape() {
        let query = member_query("sub-1", EntityKind::Subscription, Cloud::Azure);
        let json = serde_json::to_value(&query).unwrap();

        assert_eq!(json["type"][0], "USER_ACCOUNT");
        assert_eq!(json["select"], true);
        let binding = &json["relationships"][0];
        assert_eq!(binding["type"][0]["type"], "ASSIGNED_TO");
        assert_eq!(binding["type"][0]["reverse"], true);
        assert_eq!(binding["with"]["select"], false);

        let scope = &binding["with"]["relationships"][0]["with"];
        assert_eq!(scope["type"][0], "SUBSCRIPTION");
        assert_eq!(scope["where"]["externalId"]["EQUALS"][0], "sub-1");
        assert_eq!(scope["where"]["cloudPlatform"]["EQUALS"][0], "Azure");
    }
}

//! Users holding role bindings on a subscription or organization

use log::debug;
use serde::Serialize;

use crate::client::GraphApi;
use crate::client::models::GraphSearchRow;
use crate::error::Result;
use crate::hierarchy::{Cloud, EntityKind, member_query};

/// A user to put in a project's group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub name: String,
    pub email: String,
}

/// Members from user-account rows, de-duplicated by email in first-seen order.
pub fn members_from_rows(rows: &[GraphSearchRow], cloud: Cloud) -> Vec<Member> {
    let mut members: Vec<Member> = Vec::new();

    for user in rows.iter().filter_map(|r| r.entities.first().and_then(Option::as_ref)) {
        let name = user.property("name").unwrap_or(&user.name).to_string();
        let Some(email) = user.property(cloud.email_property()) else {
            debug!("User {} has no {}; skipping", name, cloud.email_property());
            continue;
        };
        if members.iter().any(|m| m.email == email) {
            continue;
        }
        members.push(Member {
            name,
            email: email.to_string(),
        });
    }

    members
}

/// Look up the members of one scope.
///
/// AWS organizations carry no role bindings, so they never have members.
pub async fn fetch_members<A>(
    api: &A,
    scope_external_id: &str,
    kind: EntityKind,
    cloud: Cloud,
) -> Result<Vec<Member>>
where
    A: GraphApi + ?Sized,
{
    if kind == EntityKind::CloudOrganization && !cloud.has_organization_bindings() {
        return Ok(Vec::new());
    }

    let query = member_query(scope_external_id, kind, cloud);
    let rows = api.graph_search_all(&query).await?;
    Ok(members_from_rows(&rows.items, cloud))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockWizClient;
    use crate::client::models::GraphEntity;
    use serde_json::json;

    fn user(name: &str, upn: &str) -> GraphSearchRow {
        GraphSearchRow {
            entities: vec![Some(GraphEntity {
                id: format!("u-{}", name),
                name: upn.to_string(),
                entity_type: "USER_ACCOUNT".to_string(),
                properties: json!({ "name": name, "userPrincipalName": upn }),
            })],
        }
    }

    #[test]
    fn test_members_use_cloud_email_property() {
        let rows = vec![user("Ada", "ada@corp"), user("Ada", "ada@corp"), user("Lin", "lin@corp")];

        let azure = members_from_rows(&rows, Cloud::Azure);
        assert_eq!(azure.len(), 2);
        assert_eq!(azure[0], Member { name: "Ada".into(), email: "ada@corp".into() });

        // Elsewhere the email is the `name` property
        let gcp = members_from_rows(&rows, Cloud::Gcp);
        assert_eq!(gcp[1].email, "Lin");
    }

    #[tokio::test]
    async fn test_fetch_members_queries_scope() {
        let mock = MockWizClient::new()
            .with_graph_rows("sub-1", vec![user("Ada", "ada@corp")])
            .await;

        let members = fetch_members(&mock, "sub-1", EntityKind::Subscription, Cloud::Azure)
            .await
            .unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(mock.call_counts().await.graph_search, 1);
    }

    #[tokio::test]
    async fn test_aws_organizations_have_no_members() {
        let mock = MockWizClient::new();
        let members = fetch_members(&mock, "ou-1", EntityKind::CloudOrganization, Cloud::Aws)
            .await
            .unwrap();
        assert!(members.is_empty());
        assert_eq!(mock.call_counts().await.graph_search, 0);
    }
}

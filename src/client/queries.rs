//! GraphQL documents sent to the API

pub const GRAPH_SEARCH: &str = r#"
query GraphSearch(
  $query: GraphEntityQueryInput
  $projectId: String!
  $first: Int
  $after: String
  $quick: Boolean = false
) {
  graphSearch(
    query: $query
    projectId: $projectId
    first: $first
    after: $after
    quick: $quick
  ) {
    pageInfo {
      endCursor
      hasNextPage
    }
    nodes {
      entities {
        id
        name
        type
        properties
      }
    }
  }
}
"#;

pub const PROJECTS_TABLE: &str = r#"
query ProjectsTable(
  $filterBy: ProjectFilters
  $first: Int
  $after: String
  $orderBy: ProjectOrder
) {
  projects(filterBy: $filterBy, first: $first, after: $after, orderBy: $orderBy) {
    nodes {
      id
      name
      slug
      isFolder
      archived
      childProjectCount
      cloudAccountLinks {
        cloudAccount {
          id
          externalId
        }
        shared
        environment
        resourceGroups
        resourceTags {
          key
          value
        }
      }
      cloudOrganizationLinks {
        cloudOrganization {
          id
          externalId
        }
        shared
        environment
        resourceGroups
        resourceTags {
          key
          value
        }
      }
      ancestorProjects {
        id
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
    totalCount
  }
}
"#;

pub const CLOUD_ACCOUNTS_PAGE: &str = r#"
query CloudAccountsPage($filterBy: CloudAccountFilters, $first: Int, $after: String) {
  cloudAccounts(filterBy: $filterBy, first: $first, after: $after) {
    nodes {
      id
      name
      externalId
      cloudProvider
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"#;

pub const CLOUD_ORGANIZATIONS: &str = r#"
query CloudOrganizations($filterBy: CloudOrganizationFilters, $first: Int, $after: String) {
  cloudOrganizations(filterBy: $filterBy, first: $first, after: $after) {
    nodes {
      id
      name
      externalId
      cloudProvider
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"#;

pub const CREATE_PROJECT: &str = r#"
mutation CreateProject($input: CreateProjectInput!) {
  createProject(input: $input) {
    project {
      id
    }
  }
}
"#;

pub const UPDATE_PROJECT: &str = r#"
mutation UpdateProject($input: UpdateProjectInput!) {
  updateProject(input: $input) {
    project {
      id
    }
  }
}
"#;

pub const SAML_IDENTITY_PROVIDERS_TABLE: &str = r#"
query SAMLIdentityProvidersTable(
  $first: Int
  $after: String
  $filterBy: SAMLIdentityProviderFilters
) {
  samlIdentityProviders(first: $first, after: $after, filterBy: $filterBy) {
    nodes {
      id
      name
      loginURL
    }
    pageInfo {
      hasNextPage
      endCursor
    }
    totalCount
  }
}
"#;

pub const LOAD_SAML_IDENTITY_PROVIDER: &str = r#"
query LoadSAMLIdentityProvider($id: ID!) {
  samlIdentityProvider(id: $id) {
    id
    name
    loginURL
    logoutURL
    useProviderManagedRoles
    certificate
    domains
    issuerURL
    mergeGroupsMappingByRole
    allowManualRoleOverride
    groupMapping {
      providerGroupId
      role {
        id
        name
        isProjectScoped
      }
      projects {
        id
        name
      }
    }
  }
}
"#;

pub const UPDATE_SAML_IDENTITY_PROVIDER: &str = r#"
mutation UpdateSAMLIdentityProvider($input: UpdateSAMLIdentityProviderInput!) {
  updateSAMLIdentityProvider(input: $input) {
    samlIdentityProvider {
      id
      name
    }
  }
}
"#;

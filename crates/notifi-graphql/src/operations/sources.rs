//! Sources, source groups and filters.

use serde::Serialize;

use super::{IdVariables, NoVariables, NullableList, operation};
use crate::fragments::{FILTER, PAGE_INFO, SOURCE, SOURCE_GROUP};
use crate::models::{Connection, Filter, IdResult, Source, SourceGroup};

operation! {
    /// List the user's sources.
    GetSources {
        name: "getSources",
        root: "source",
        variables: NoVariables,
        response: NullableList<Source>,
        fragments: [SOURCE],
        document: r"query getSources {
  source {
    ...SourceFragment
  }
}",
    }
}

/// Variables of [`CreateSource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSourceVariables {
    /// Source name.
    pub name: String,
    /// Source type, e.g. `SOLANA_WALLET`.
    #[serde(rename = "type")]
    pub source_type: String,
    /// Watched address or identifier.
    pub blockchain_address: String,
    /// Fusion event type for custom sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fusion_event_type_id: Option<String>,
}

operation! {
    /// Create a source.
    CreateSource {
        name: "createSource",
        root: "createSource",
        variables: CreateSourceVariables,
        response: Option<Source>,
        fragments: [SOURCE],
        document: r"mutation createSource(
  $name: String!
  $blockchainAddress: String!
  $type: SourceType!
  $fusionEventTypeId: String
) {
  createSource(
    createSourceInput: {
      name: $name
      blockchainAddress: $blockchainAddress
      type: $type
      fusionEventTypeId: $fusionEventTypeId
    }
  ) {
    ...SourceFragment
  }
}",
    }
}

/// Filter of [`GetSourceConnection`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConnectionInput {
    /// Only sources of these types.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_types: Vec<String>,
}

/// Variables of [`GetSourceConnection`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetSourceConnectionVariables {
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    /// Cursor to continue after.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Filter.
    pub input: SourceConnectionInput,
}

operation! {
    /// Page through the tenant's sources.
    GetSourceConnection {
        name: "getSourceConnection",
        root: "sources",
        variables: GetSourceConnectionVariables,
        response: Option<Connection<Source>>,
        fragments: [SOURCE, PAGE_INFO],
        document: r"query getSourceConnection($first: Int, $after: String, $input: GetSourcesInput!) {
  sources(first: $first, after: $after, getSourcesInput: $input) {
    pageInfo {
      ...PageInfoFragment
    }
    nodes {
      ...SourceFragment
    }
  }
}",
    }
}

operation! {
    /// List every filter.
    GetFilters {
        name: "getFilters",
        root: "filter",
        variables: NoVariables,
        response: NullableList<Filter>,
        fragments: [FILTER],
        document: r"query getFilters {
  filter {
    ...FilterFragment
  }
}",
    }
}

operation! {
    /// List source groups.
    GetSourceGroups {
        name: "getSourceGroups",
        root: "sourceGroup",
        variables: NoVariables,
        response: NullableList<SourceGroup>,
        fragments: [SOURCE_GROUP],
        document: r"query getSourceGroups {
  sourceGroup {
    ...SourceGroupFragment
  }
}",
    }
}

/// Variables of [`CreateSourceGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSourceGroupVariables {
    /// Group name.
    pub name: String,
    /// Member sources.
    pub source_ids: Vec<String>,
}

/// Variables of [`UpdateSourceGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSourceGroupVariables {
    /// Group to update.
    pub id: String,
    /// New name.
    pub name: String,
    /// Replacement member sources.
    pub source_ids: Vec<String>,
}

operation! {
    /// Create a source group.
    CreateSourceGroup {
        name: "createSourceGroup",
        root: "createSourceGroup",
        variables: CreateSourceGroupVariables,
        response: Option<SourceGroup>,
        fragments: [SOURCE_GROUP],
        document: r"mutation createSourceGroup($name: String!, $sourceIds: [String!]!) {
  createSourceGroup(sourceGroupInput: { name: $name, sourceIds: $sourceIds }) {
    ...SourceGroupFragment
  }
}",
    }
}

operation! {
    /// Replace the members of a source group.
    UpdateSourceGroup {
        name: "updateSourceGroup",
        root: "updateSourceGroup",
        variables: UpdateSourceGroupVariables,
        response: Option<SourceGroup>,
        fragments: [SOURCE_GROUP],
        document: r"mutation updateSourceGroup($id: String!, $name: String!, $sourceIds: [String!]!) {
  updateSourceGroup(sourceGroupInput: { id: $id, name: $name, sourceIds: $sourceIds }) {
    ...SourceGroupFragment
  }
}",
    }
}

operation! {
    /// Delete a source group.
    DeleteSourceGroup {
        name: "deleteSourceGroup",
        root: "deleteSourceGroup",
        variables: IdVariables,
        response: Option<IdResult>,
        fragments: [],
        document: r"mutation deleteSourceGroup($id: String!) {
  deleteSourceGroup(sourceGroupInput: { id: $id }) {
    id
  }
}",
    }
}

/// Source addressed either by ID or by its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceGroupMembershipInput {
    /// Group to change.
    pub source_group_id: String,
    /// Existing source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// Source to match or create by definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_input: Option<CreateSourceVariables>,
}

/// Variables of [`AddSourceToSourceGroup`] and [`RemoveSourceFromSourceGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceGroupMembershipVariables {
    /// Membership change.
    pub input: SourceGroupMembershipInput,
}

operation! {
    /// Add a source to a group.
    AddSourceToSourceGroup {
        name: "addSourceToSourceGroup",
        root: "addSourceToSourceGroup",
        variables: SourceGroupMembershipVariables,
        response: Option<SourceGroup>,
        fragments: [SOURCE_GROUP],
        document: r"mutation addSourceToSourceGroup($input: AddSourceToSourceGroupInput!) {
  addSourceToSourceGroup(input: $input) {
    ...SourceGroupFragment
  }
}",
    }
}

operation! {
    /// Remove a source from a group.
    RemoveSourceFromSourceGroup {
        name: "removeSourceFromSourceGroup",
        root: "removeSourceFromSourceGroup",
        variables: SourceGroupMembershipVariables,
        response: Option<SourceGroup>,
        fragments: [SOURCE_GROUP],
        document: r"mutation removeSourceFromSourceGroup($input: RemoveSourceFromSourceGroupInput!) {
  removeSourceFromSourceGroup(input: $input) {
    ...SourceGroupFragment
  }
}",
    }
}

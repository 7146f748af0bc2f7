//! Alerts.

use serde::Serialize;

use super::{IdVariables, NoVariables, NullableList, operation};
use crate::fragments::ALERT;
use crate::models::{Alert, IdResult};

operation! {
    /// List the user's alerts.
    GetAlerts {
        name: "getAlerts",
        root: "alert",
        variables: NoVariables,
        response: NullableList<Alert>,
        fragments: [ALERT],
        document: r"query getAlerts {
  alert {
    ...AlertFragment
  }
}",
    }
}

/// Variables of [`CreateAlert`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertVariables {
    /// Alert name.
    pub name: String,
    /// Watched sources.
    pub source_group_id: String,
    /// Filter.
    pub filter_id: String,
    /// Destinations.
    pub target_group_id: String,
    /// Packed filter options.
    pub filter_options: String,
    /// Grouping label.
    pub group_name: String,
}

operation! {
    /// Create an alert.
    CreateAlert {
        name: "createAlert",
        root: "createAlert",
        variables: CreateAlertVariables,
        response: Option<Alert>,
        fragments: [ALERT],
        document: r"mutation createAlert(
  $name: String!
  $sourceGroupId: String!
  $filterId: String!
  $targetGroupId: String!
  $filterOptions: String!
  $groupName: String!
) {
  createAlert(
    alertInput: {
      name: $name
      sourceGroupId: $sourceGroupId
      filterId: $filterId
      targetGroupId: $targetGroupId
      filterOptions: $filterOptions
      groupName: $groupName
    }
  ) {
    ...AlertFragment
  }
}",
    }
}

operation! {
    /// Delete one of the user's alerts.
    DeleteAlert {
        name: "deleteAlert",
        root: "deleteAlert",
        variables: IdVariables,
        response: Option<IdResult>,
        fragments: [],
        document: r"mutation deleteAlert($id: String!) {
  deleteAlert(alertId: $id) {
    id
  }
}",
    }
}

/// Variables of [`DeleteUserAlert`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserAlertVariables {
    /// Alert to delete.
    pub alert_id: String,
}

operation! {
    /// Delete a user's alert on behalf of the tenant.
    DeleteUserAlert {
        name: "deleteUserAlert",
        root: "deleteUserAlert",
        variables: DeleteUserAlertVariables,
        response: Option<IdResult>,
        fragments: [],
        document: r"mutation deleteUserAlert($alertId: String!) {
  deleteUserAlert(alertId: $alertId) {
    id
  }
}",
    }
}

/// Destinations of a direct push alert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDirectPushAlertInput {
    /// Tenant-chosen key later used as the message key.
    pub push_id: String,
    /// Email addresses.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub email_addresses: Vec<String>,
    /// Phone numbers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phone_numbers: Vec<String>,
    /// Telegram handles.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub telegram_ids: Vec<String>,
}

/// Variables of [`CreateDirectPushAlert`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateDirectPushAlertVariables {
    /// Alert definition.
    pub input: CreateDirectPushAlertInput,
}

operation! {
    /// Create a tenant-managed direct push alert.
    CreateDirectPushAlert {
        name: "createDirectPushAlert",
        root: "createDirectPushAlert",
        variables: CreateDirectPushAlertVariables,
        response: Option<IdResult>,
        fragments: [],
        document: r"mutation createDirectPushAlert($input: CreateDirectPushAlertInput!) {
  createDirectPushAlert(createDirectPushAlertInput: $input) {
    id
  }
}",
    }
}

/// Alert addressed by [`DeleteDirectPushAlert`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDirectPushAlertInput {
    /// Alert to delete.
    pub alert_id: String,
}

/// Variables of [`DeleteDirectPushAlert`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteDirectPushAlertVariables {
    /// Alert to delete.
    pub input: DeleteDirectPushAlertInput,
}

operation! {
    /// Delete a direct push alert.
    DeleteDirectPushAlert {
        name: "deleteDirectPushAlert",
        root: "deleteDirectPushAlert",
        variables: DeleteDirectPushAlertVariables,
        response: Option<IdResult>,
        fragments: [],
        document: r"mutation deleteDirectPushAlert($input: DeleteDirectPushAlertInput!) {
  deleteDirectPushAlert(deleteDirectPushAlertInput: $input) {
    id
  }
}",
    }
}

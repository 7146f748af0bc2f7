//! Notification history.

use super::{PageVariables, operation};
use crate::fragments::{NOTIFICATION_HISTORY_ENTRY, PAGE_INFO};
use crate::models::NotificationHistoryConnection;

operation! {
    /// Page through delivered notifications, newest first.
    GetNotificationHistory {
        name: "getNotificationHistory",
        root: "notificationHistory",
        variables: PageVariables,
        response: Option<NotificationHistoryConnection>,
        fragments: [PAGE_INFO, NOTIFICATION_HISTORY_ENTRY],
        document: r"query getNotificationHistory($first: Int, $after: String) {
  notificationHistory(first: $first, after: $after) {
    pageInfo {
      ...PageInfoFragment
    }
    nodes {
      ...NotificationHistoryEntryFragment
    }
  }
}",
    }
}

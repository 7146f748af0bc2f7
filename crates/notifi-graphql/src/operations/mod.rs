//! Typed GraphQL operations.
//!
//! Each operation is a unit struct implementing [`Operation`]. Its document
//! is assembled once, on first use, from the operation text and the
//! fragments it spreads.

use serde::Serialize;
use serde::de::DeserializeOwned;

pub mod alerts;
pub mod auth;
pub mod conversation;
pub mod history;
pub mod sources;
pub mod targets;
pub mod tenant;

/// A GraphQL query or mutation.
pub trait Operation {
    /// Operation name, sent as `operationName`.
    const NAME: &'static str;

    /// Field of `data` holding the result, or `None` for the whole object.
    const ROOT: Option<&'static str>;

    /// Variables sent with the document.
    type Variables: Serialize + Send + Sync;

    /// Decoded value of [`Self::ROOT`].
    type Response: DeserializeOwned;

    /// Full document including fragments.
    fn document() -> &'static str;
}

/// Variables of operations that take none.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoVariables {}

/// A list field whose entries may be null.
pub type NullableList<T> = Option<Vec<Option<T>>>;

/// Drop the nulls of a [`NullableList`].
#[must_use]
pub fn into_list<T>(list: NullableList<T>) -> Vec<T> {
    list.unwrap_or_default().into_iter().flatten().collect()
}

/// Variables of operations addressing an entity by ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdVariables {
    /// Entity ID.
    pub id: String,
}

impl IdVariables {
    /// Address `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Relay pagination arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageVariables {
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    /// Cursor to continue after.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// Declare an operation type.
macro_rules! operation {
    (
        $(#[$meta:meta])*
        $ty:ident {
            name: $name:literal,
            root: $root:literal,
            variables: $vars:ty,
            response: $resp:ty,
            fragments: [$($fragment:expr),* $(,)?],
            document: $document:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $ty;

        impl $crate::operations::Operation for $ty {
            const NAME: &'static str = $name;
            const ROOT: Option<&'static str> = Some($root);
            type Variables = $vars;
            type Response = $resp;

            fn document() -> &'static str {
                static DOCUMENT: std::sync::OnceLock<String> = std::sync::OnceLock::new();
                DOCUMENT.get_or_init(|| {
                    $crate::fragments::collect_dependencies($document, &[$(&$fragment),*])
                })
            }
        }
    };
}

pub(crate) use operation;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::alerts::GetAlerts;
    use crate::operations::auth::LogInFromDapp;
    use crate::operations::targets::DeleteTargetGroup;

    #[test]
    fn test_document_carries_fragments() {
        let document = GetAlerts::document();
        assert!(document.contains("fragment AlertFragment on Alert"));
        assert!(document.contains("fragment TargetGroupFragment on TargetGroup"));
        assert!(document.ends_with('}'));
        assert!(std::ptr::eq(document, GetAlerts::document()));
    }

    #[test]
    fn test_document_without_fragments() {
        let document = DeleteTargetGroup::document();
        assert!(document.starts_with("mutation deleteTargetGroup"));
        assert!(!document.contains("fragment"));
    }

    #[test]
    fn test_names_match_documents() {
        assert!(LogInFromDapp::document().contains(&format!("mutation {}(", LogInFromDapp::NAME)));
        assert_eq!(GetAlerts::ROOT, Some("alert"));
    }

    #[test]
    fn test_into_list_drops_nulls() {
        let list: NullableList<u8> = Some(vec![Some(1), None, Some(2)]);
        assert_eq!(into_list(list), vec![1, 2]);
        assert!(into_list::<u8>(None).is_empty());
    }

    #[test]
    fn test_page_variables_omit_unset() {
        let value = serde_json::to_value(PageVariables {
            first: Some(10),
            after: None,
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({ "first": 10 }));
    }
}

//! String identifiers for layers, groups, assets, pages and documents.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new unique identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Wrap an identifier issued elsewhere (host shell, template data).
            #[must_use]
            pub fn from_string(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::from_string(id)
            }
        }
    };
}

string_id!(
    /// Unique, immutable identifier of a layer.
    LayerId
);

string_id!(
    /// Identifier shared by every member of a layer group.
    GroupId
);

string_id!(
    /// Identifier of an image asset in the project library.
    AssetId
);

string_id!(
    /// Identifier of a page.
    PageId
);

string_id!(
    /// Identifier of a document.
    DocumentId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(LayerId::new(), LayerId::new());
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = GroupId::from_string("group-1");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"group-1\"");
        let back: GroupId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}

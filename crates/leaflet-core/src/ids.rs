//! Typed identifiers.
//!
//! Every document is keyed by a UUID, but identifiers travel as strings
//! through the HTTP layer and inside JSON sub-documents. `parse` is the single
//! place where a string is checked before it is turned into a store key; a
//! string that does not parse never reaches the database.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when a string is not a valid identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} id: {value:?}")]
pub struct IdParseError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! document_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parses an identifier, returning `None` when the string is not
            /// syntactically valid.
            #[must_use]
            pub fn parse(s: &str) -> Option<Self> {
                Uuid::parse_str(s).ok().map(Self)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s).ok_or_else(|| IdParseError {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

document_id!(
    /// Identifier of a user document.
    UserId,
    "user"
);

document_id!(
    /// Identifier of a workspace document.
    WorkspaceId,
    "workspace"
);

document_id!(
    /// Identifier of a page document.
    PageId,
    "page"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_uuid_strings() {
        let id = WorkspaceId::new();
        assert_eq!(WorkspaceId::parse(&id.to_string()), Some(id));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(WorkspaceId::parse("not-an-id"), None);
        assert_eq!(PageId::parse(""), None);
        assert_eq!(UserId::parse("123"), None);
    }

    #[test]
    fn from_str_reports_kind() {
        let err = "nope".parse::<PageId>().unwrap_err();
        assert_eq!(err.kind, "page");
        assert_eq!(err.to_string(), "invalid page id: \"nope\"");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = UserId::new();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }
}

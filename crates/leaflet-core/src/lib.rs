//! leaflet-core: shared domain types for the Leaflet workspace backend.
//!
//! This crate provides:
//! - Typed identifiers for users, workspaces and pages
//! - Page references (`<slug>-<suffix>`) and materialized paths
//! - Document shapes for users, workspaces and pages
//! - Pure queries over a workspace's page index (root pages, descendants)
//!
//! Nothing in here touches the database; the store and server crates build
//! on these types.

pub mod ids;
pub mod path;
pub mod tree;
pub mod types;

pub use ids::{IdParseError, PageId, UserId, WorkspaceId};
pub use path::{
    segment_pattern, slugify, PagePath, PathError, Reference, PATH_DELIMITER, TOKEN_DELIMITER,
};
pub use tree::{children_of, find_entry, root_pages};
pub use types::*;

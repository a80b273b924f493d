//! leaflet-store: document storage for Leaflet.
//!
//! This crate provides:
//! - A PostgreSQL-backed [`Store`] handle with embedded migrations
//! - One repository per collection: [`UserRepository`],
//!   [`WorkspaceRepository`], [`PageRepository`]
//!
//! # Layout
//!
//! Each user, workspace and page is one row. Nested collections (a
//! workspace's members and page index, a user's workspace list and
//! favorites) are JSONB arrays updated with single-statement set operations.
//!
//! # Usage
//!
//! ```rust,ignore
//! use leaflet_store::{Repositories, Store, StoreConfig};
//!
//! let store = Store::connect(StoreConfig::from_env()?).await?;
//! let repos = Repositories::new(&store);
//!
//! let members = repos.workspaces.get_all_members(&workspace_id).await?;
//!
//! store.close().await;
//! ```

pub mod error;
pub mod models;
pub mod pages;
pub mod schema;
pub mod store;
pub mod users;
pub mod workspaces;

pub use error::{StoreError, StoreResult};
pub use models::*;
pub use pages::PageRepository;
pub use store::{Store, StoreConfig};
pub use users::UserRepository;
pub use workspaces::WorkspaceRepository;

// Re-export leaflet-core for downstream crates
pub use leaflet_core;

/// The three repositories, sharing one store handle.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub workspaces: WorkspaceRepository,
    pub pages: PageRepository,
}

impl Repositories {
    pub fn new(store: &Store) -> Self {
        Self {
            users: UserRepository::new(store.clone()),
            workspaces: WorkspaceRepository::new(store.clone()),
            pages: PageRepository::new(store.clone()),
        }
    }
}

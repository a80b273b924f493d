//! Database models for the storage layer.
//!
//! Row types map directly to table rows and are converted into the
//! leaflet-core document types on the way out. Input types describe what a
//! caller may write; `Option` fields in update types mean "leave unchanged".

use chrono::{DateTime, Utc};
use leaflet_core::{
    Page, PageId, PageMeta, PagePath, Reference, User, UserId, Workspace, WorkspaceAccess,
    WorkspaceId,
};
use serde::Serialize;
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use crate::error::StoreError;

pub(crate) const USER_COLUMNS: &str = "id, name, email, password_hash, preferences, \
     profile_picture, workspaces, created_at, updated_at";

pub(crate) const WORKSPACE_COLUMNS: &str =
    "id, name, icon, members, pages, created_at, updated_at";

pub(crate) const PAGE_COLUMNS: &str = "id, workspace_id, title, icon, cover_image, content, \
     favorites, settings, reference, path, created_at, updated_at";

// ============================================================================
// Rows
// ============================================================================

/// Database row for the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub preferences: serde_json::Value,
    pub profile_picture: Option<String>,
    pub workspaces: Json<Vec<WorkspaceAccess>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            preferences: row.preferences,
            profile_picture: row.profile_picture,
            workspaces: row.workspaces.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for the `workspaces` table.
#[derive(Debug, Clone, FromRow)]
pub struct WorkspaceRow {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub members: Json<Vec<UserId>>,
    pub pages: Json<Vec<PageMeta>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<WorkspaceRow> for Workspace {
    fn from(row: WorkspaceRow) -> Self {
        Self {
            id: WorkspaceId::from_uuid(row.id),
            name: row.name,
            icon: row.icon,
            members: row.members.0,
            pages: row.pages.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for the `pages` table.
///
/// `reference` and `path` are stored as plain text and validated when the
/// row is converted into a [`Page`].
#[derive(Debug, Clone, FromRow)]
pub struct PageRow {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub title: String,
    pub icon: Option<String>,
    pub cover_image: Option<String>,
    pub content: serde_json::Value,
    pub favorites: Json<Vec<UserId>>,
    pub settings: serde_json::Value,
    pub reference: String,
    pub path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<PageRow> for Page {
    type Error = StoreError;

    fn try_from(row: PageRow) -> Result<Self, Self::Error> {
        let reference = Reference::parse(row.reference)?;
        let path = row.path.map(|p| p.parse::<PagePath>()).transpose()?;

        Ok(Self {
            id: PageId::from_uuid(row.id),
            workspace_id: WorkspaceId::from_uuid(row.workspace_id),
            title: row.title,
            icon: row.icon,
            cover_image: row.cover_image,
            content: row.content,
            favorites: row.favorites.0,
            settings: row.settings,
            reference,
            path,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// Input for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial update of a user's profile.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub preferences: Option<serde_json::Value>,
    pub profile_picture: Option<String>,
}

/// Input for creating a new workspace.
#[derive(Debug, Clone)]
pub struct NewWorkspace {
    pub name: String,
    pub icon: Option<String>,
}

/// Partial update of a workspace's own fields.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
}

impl WorkspaceUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.icon.is_none()
    }
}

/// Input for creating a new page.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub workspace_id: WorkspaceId,
    pub title: String,
    pub icon: Option<String>,
    pub cover_image: Option<String>,
    pub content: serde_json::Value,
    pub settings: serde_json::Value,
    /// `None` creates a root page.
    pub path: Option<PagePath>,
}

impl NewPage {
    /// A root page with empty content.
    pub fn new(workspace_id: WorkspaceId, title: impl Into<String>) -> Self {
        Self {
            workspace_id,
            title: title.into(),
            icon: None,
            cover_image: None,
            content: serde_json::json!({}),
            settings: serde_json::json!({}),
            path: None,
        }
    }

    pub fn with_path(mut self, path: PagePath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }
}

/// Partial update of a page's body fields. Title changes go through
/// `PageRepository::update_title` because they also move the reference.
#[derive(Debug, Clone, Default)]
pub struct PageUpdate {
    pub icon: Option<String>,
    pub cover_image: Option<String>,
    pub content: Option<serde_json::Value>,
    pub settings: Option<serde_json::Value>,
}

impl PageUpdate {
    pub fn is_empty(&self) -> bool {
        self.icon.is_none()
            && self.cover_image.is_none()
            && self.content.is_none()
            && self.settings.is_none()
    }
}

/// Fields of a workspace page-index entry to overwrite in place.
///
/// Serialized into a JSON object containing only the set fields, which is
/// merged over the stored entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetaPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PagePath>,
}

impl PageMetaPatch {
    pub fn rename(title: impl Into<String>, reference: Reference) -> Self {
        Self {
            title: Some(title.into()),
            reference: Some(reference),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

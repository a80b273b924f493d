//! Document shapes for users, workspaces and pages.
//!
//! These are the values handed between the store, the use cases and the
//! HTTP layer. Nested collections (a workspace's page index, a user's
//! workspace list) serialize with camelCase keys, matching how they are
//! persisted inside their parent document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{PageId, UserId, WorkspaceId};
use crate::path::{PagePath, Reference};

// ============================================================================
// Users
// ============================================================================

/// One workspace a user can access, with the pages they starred in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceAccess {
    pub workspace_id: WorkspaceId,
    #[serde(default)]
    pub favorites: Vec<PageId>,
}

impl WorkspaceAccess {
    pub fn new(workspace_id: WorkspaceId) -> Self {
        Self {
            workspace_id,
            favorites: Vec::new(),
        }
    }
}

/// A user document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Free-form display preferences (theme, font, ...).
    pub preferences: serde_json::Value,
    pub profile_picture: Option<String>,
    /// Unique by `workspace_id`, in the order access was granted.
    pub workspaces: Vec<WorkspaceAccess>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn access(&self, workspace_id: WorkspaceId) -> Option<&WorkspaceAccess> {
        self.workspaces
            .iter()
            .find(|w| w.workspace_id == workspace_id)
    }
}

// ============================================================================
// Workspaces
// ============================================================================

/// Summary of a page kept inside its workspace document for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page_id: PageId,
    pub reference: Reference,
    /// `None` for root pages.
    pub path: Option<PagePath>,
    pub icon: Option<String>,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Page> for PageMeta {
    fn from(page: &Page) -> Self {
        Self {
            page_id: page.id,
            reference: page.reference.clone(),
            path: page.path.clone(),
            icon: page.icon.clone(),
            title: page.title.clone(),
            created_at: page.created_at,
        }
    }
}

/// A workspace document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub icon: Option<String>,
    /// Set semantics: no duplicates.
    pub members: Vec<UserId>,
    /// Page index, unique by `page_id`.
    pub pages: Vec<PageMeta>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Workspace {
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.members.contains(&user_id)
    }
}

// ============================================================================
// Pages
// ============================================================================

/// A page document. The authoritative copy of everything [`PageMeta`]
/// caches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub workspace_id: WorkspaceId,
    pub title: String,
    pub icon: Option<String>,
    pub cover_image: Option<String>,
    /// Rich content payload, opaque to the backend.
    pub content: serde_json::Value,
    /// Users that starred this page.
    pub favorites: Vec<UserId>,
    pub settings: serde_json::Value,
    pub reference: Reference,
    pub path: Option<PagePath>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Page {
    pub fn is_root(&self) -> bool {
        self.path.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_page() -> Page {
        Page {
            id: PageId::new(),
            workspace_id: WorkspaceId::new(),
            title: "Roadmap".to_string(),
            icon: Some("🗺".to_string()),
            cover_image: None,
            content: json!({"blocks": []}),
            favorites: vec![],
            settings: json!({}),
            reference: Reference::parse("Roadmap-abc").unwrap(),
            path: Some("/,home-1,/".parse().unwrap()),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn page_meta_mirrors_page() {
        let page = sample_page();
        let meta = PageMeta::from(&page);
        assert_eq!(meta.page_id, page.id);
        assert_eq!(meta.reference, page.reference);
        assert_eq!(meta.path, page.path);
        assert_eq!(meta.title, "Roadmap");
        assert!(!page.is_root());
    }

    #[test]
    fn page_meta_uses_camel_case_keys() {
        let meta = PageMeta::from(&sample_page());
        let value = serde_json::to_value(&meta).unwrap();
        assert!(value.get("pageId").is_some());
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["path"], json!("/,home-1,/"));
    }

    #[test]
    fn root_meta_serializes_null_path() {
        let mut page = sample_page();
        page.path = None;
        let value = serde_json::to_value(PageMeta::from(&page)).unwrap();
        assert!(value["path"].is_null());
    }

    #[test]
    fn user_hides_password_hash() {
        let user = User {
            id: UserId::new(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            preferences: json!({"theme": "dark"}),
            profile_picture: None,
            workspaces: vec![WorkspaceAccess::new(WorkspaceId::new())],
            created_at: Utc::now(),
            updated_at: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("workspaceId"));
        assert!(user.access(user.workspaces[0].workspace_id).is_some());
    }

    #[test]
    fn workspace_access_defaults_favorites() {
        let id = WorkspaceId::new();
        let access: WorkspaceAccess =
            serde_json::from_value(json!({"workspaceId": id.to_string()})).unwrap();
        assert_eq!(access, WorkspaceAccess::new(id));
    }
}

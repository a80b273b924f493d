//! Use-case tests against a live PostgreSQL database.
//!
//! Run with:
//! `TEST_DATABASE_URL=postgres://... cargo test -p leaflet-server --features integration-tests`
#![cfg(feature = "integration-tests")]

use leaflet_core::UserId;
use leaflet_server::usecases::pages::{self, CreatePage};
use leaflet_server::usecases::workspaces::{self, DEFAULT_PAGE_TITLE};
use leaflet_server::usecases::{UseCaseError, users};
use leaflet_server::auth;
use leaflet_store::{NewUser, NewWorkspace, PageUpdate, Repositories, Store, StoreConfig};

async fn repos() -> Repositories {
    let database_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| StoreConfig::default().database_url);
    let store = Store::connect(StoreConfig {
        database_url,
        max_connections: 2,
        ..StoreConfig::default()
    })
    .await
    .expect("connect to test database");
    Repositories::new(&store)
}

async fn user(repos: &Repositories) -> UserId {
    users::register(
        repos,
        &NewUser {
            name: "Ada".to_string(),
            email: format!("{}@example.com", UserId::new()),
            password_hash: "hash".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn workspace(repos: &Repositories, owner: UserId) -> String {
    let input = NewWorkspace {
        name: "W".to_string(),
        icon: Some("X".to_string()),
    };
    workspaces::create_workspace(repos, owner, &input)
        .await
        .unwrap()
        .to_string()
}

fn child_of(title: &str, parent: &leaflet_core::Page) -> CreatePage {
    CreatePage {
        title: title.to_string(),
        icon: None,
        parent_id: Some(parent.id.to_string()),
    }
}

#[tokio::test]
async fn create_workspace_seeds_default_page() {
    let repos = repos().await;
    let owner = user(&repos).await;
    let ws = workspace(&repos, owner).await;

    let workspace = workspaces::get_workspace_by_id(&repos, owner, &ws)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(workspace.name, "W");
    assert_eq!(workspace.icon.as_deref(), Some("X"));
    assert_eq!(workspace.members, vec![owner]);
    assert_eq!(workspace.pages.len(), 1);

    let entry = &workspace.pages[0];
    assert_eq!(entry.title, DEFAULT_PAGE_TITLE);
    assert!(entry.path.is_none());

    let page = pages::get_page(&repos, owner, &entry.page_id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(page.reference, entry.reference);
    assert!(page.reference.as_str().starts_with("notion-clone-project-"));

    let profile = users::get_profile(&repos, owner).await.unwrap();
    assert_eq!(profile.workspaces.len(), 1);
    assert_eq!(profile.workspaces[0].workspace_id, workspace.id);
}

#[tokio::test]
async fn non_members_are_forbidden() {
    let repos = repos().await;
    let owner = user(&repos).await;
    let outsider = user(&repos).await;
    let ws = workspace(&repos, owner).await;

    assert!(matches!(
        workspaces::get_workspace_by_id(&repos, outsider, &ws).await,
        Err(UseCaseError::Forbidden(_))
    ));

    workspaces::add_member(&repos, owner, &ws, &outsider.to_string())
        .await
        .unwrap();
    workspaces::add_member(&repos, owner, &ws, &outsider.to_string())
        .await
        .unwrap();
    let members = workspaces::get_all_members_by_workspace_id(&repos, outsider, &ws)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(members, vec![owner, outsider]);

    workspaces::remove_member(&repos, owner, &ws, &UserId::new().to_string())
        .await
        .unwrap();
    workspaces::remove_member(&repos, owner, &ws, &outsider.to_string())
        .await
        .unwrap();
    let profile = users::get_profile(&repos, outsider).await.unwrap();
    assert!(profile.workspaces.is_empty());
}

#[tokio::test]
async fn rename_keeps_position_and_rewrites_descendant_paths() {
    let repos = repos().await;
    let owner = user(&repos).await;
    let ws = workspace(&repos, owner).await;

    let parent = pages::create_page(
        &repos,
        owner,
        &ws,
        CreatePage {
            title: "foo".to_string(),
            ..CreatePage::default()
        },
    )
    .await
    .unwrap();
    let child = pages::create_page(&repos, owner, &ws, child_of("bar", &parent))
        .await
        .unwrap();
    let grandchild = pages::create_page(&repos, owner, &ws, child_of("baz", &child))
        .await
        .unwrap();

    let renamed = pages::update_page_title(&repos, owner, &parent.id.to_string(), "renamed foo")
        .await
        .unwrap();
    assert_eq!(renamed.title, "renamed foo");
    assert_eq!(renamed.reference.suffix(), parent.reference.suffix());
    assert!(renamed.reference.as_str().starts_with("renamed-foo-"));

    let workspace = workspaces::get_workspace_by_id(&repos, owner, &ws)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(workspace.pages.len(), 4);
    assert_eq!(workspace.pages[1].page_id, parent.id);
    assert_eq!(workspace.pages[1].reference, renamed.reference);

    let below = pages::get_children(&repos, owner, &parent.id.to_string())
        .await
        .unwrap();
    let ids: Vec<_> = below.iter().map(|e| e.page_id).collect();
    assert_eq!(ids, vec![child.id, grandchild.id]);

    let grandchild = pages::get_page(&repos, owner, &grandchild.id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert!(grandchild.path.unwrap().contains(&renamed.reference));
}

#[tokio::test]
async fn delete_page_removes_subtree() {
    let repos = repos().await;
    let owner = user(&repos).await;
    let ws = workspace(&repos, owner).await;

    let parent = pages::create_page(
        &repos,
        owner,
        &ws,
        CreatePage {
            title: "doomed".to_string(),
            ..CreatePage::default()
        },
    )
    .await
    .unwrap();
    let child = pages::create_page(&repos, owner, &ws, child_of("also doomed", &parent))
        .await
        .unwrap();

    pages::delete_page(&repos, owner, &parent.id.to_string())
        .await
        .unwrap();

    assert!(
        pages::get_page(&repos, owner, &child.id.to_string())
            .await
            .unwrap()
            .is_none()
    );
    let roots = workspaces::get_root_pages(&repos, owner, &ws)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].title, DEFAULT_PAGE_TITLE);
}

#[tokio::test]
async fn delete_workspace_cascades() {
    let repos = repos().await;
    let owner = user(&repos).await;
    let ws = workspace(&repos, owner).await;
    let root = workspaces::get_root_pages(&repos, owner, &ws)
        .await
        .unwrap()
        .unwrap()
        .remove(0);

    users::add_favorite(&repos, owner, &ws, &root.page_id.to_string())
        .await
        .unwrap();
    workspaces::delete_workspace(&repos, owner, &ws).await.unwrap();

    assert!(repos.workspaces.get_by_id(&ws).await.unwrap().is_none());
    assert!(repos.pages.get_by_workspace(&ws).await.unwrap().is_empty());
    let profile = users::get_profile(&repos, owner).await.unwrap();
    assert!(profile.workspaces.is_empty());
}

#[tokio::test]
async fn delete_account_leaves_workspaces() {
    let repos = repos().await;
    let owner = user(&repos).await;
    let ws = workspace(&repos, owner).await;

    users::delete_account(&repos, owner).await.unwrap();

    let workspace = repos.workspaces.get_by_id(&ws).await.unwrap().unwrap();
    assert!(workspace.members.is_empty());
    assert!(matches!(
        users::get_profile(&repos, owner).await,
        Err(UseCaseError::NotFound(_))
    ));
}

async fn default_page(repos: &Repositories, owner: UserId, ws: &str) -> leaflet_core::PageMeta {
    workspaces::get_root_pages(repos, owner, ws)
        .await
        .unwrap()
        .unwrap()
        .remove(0)
}

#[tokio::test]
async fn favorites_cannot_reach_pages_of_other_workspaces() {
    let repos = repos().await;
    let owner = user(&repos).await;
    let outsider = user(&repos).await;
    let owner_ws = workspace(&repos, owner).await;
    let outsider_ws = workspace(&repos, outsider).await;
    let foreign_page = default_page(&repos, owner, &owner_ws).await.page_id.to_string();

    assert!(matches!(
        users::add_favorite(&repos, outsider, &outsider_ws, &foreign_page).await,
        Err(UseCaseError::Forbidden(_))
    ));
    assert!(matches!(
        users::remove_favorite(&repos, outsider, &outsider_ws, &foreign_page).await,
        Err(UseCaseError::Forbidden(_))
    ));

    let page = repos.pages.get_by_id(&foreign_page).await.unwrap().unwrap();
    assert!(page.favorites.is_empty());
    let profile = users::get_profile(&repos, outsider).await.unwrap();
    assert!(profile.workspaces[0].favorites.is_empty());
}

#[tokio::test]
async fn favorites_mark_own_pages_and_tolerate_missing_ones() {
    let repos = repos().await;
    let owner = user(&repos).await;
    let ws = workspace(&repos, owner).await;
    let page_id = default_page(&repos, owner, &ws).await.page_id;
    let missing = leaflet_core::PageId::new();

    users::add_favorite(&repos, owner, &ws, &page_id.to_string())
        .await
        .unwrap();
    users::add_favorite(&repos, owner, &ws, &missing.to_string())
        .await
        .unwrap();

    let page = repos.pages.get_by_id(&page_id.to_string()).await.unwrap().unwrap();
    assert_eq!(page.favorites, vec![owner]);
    let profile = users::get_profile(&repos, owner).await.unwrap();
    assert_eq!(profile.workspaces[0].favorites, vec![page_id, missing]);

    users::remove_favorite(&repos, owner, &ws, &page_id.to_string())
        .await
        .unwrap();
    let page = repos.pages.get_by_id(&page_id.to_string()).await.unwrap().unwrap();
    assert!(page.favorites.is_empty());
}

#[tokio::test]
async fn icon_update_syncs_workspace_entry() {
    let repos = repos().await;
    let owner = user(&repos).await;
    let ws = workspace(&repos, owner).await;
    let entry = default_page(&repos, owner, &ws).await;

    let update = PageUpdate {
        icon: Some("*".to_string()),
        content: Some(serde_json::json!({"blocks": []})),
        ..PageUpdate::default()
    };
    let page = pages::update_page(&repos, owner, &entry.page_id.to_string(), &update)
        .await
        .unwrap();
    assert_eq!(page.icon.as_deref(), Some("*"));
    assert_eq!(page.content, serde_json::json!({"blocks": []}));

    let roots = workspaces::get_root_pages(&repos, owner, &ws)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(roots[0].page_id, entry.page_id);
    assert_eq!(roots[0].icon.as_deref(), Some("*"));
    assert_eq!(roots[0].title, entry.title);
    assert_eq!(roots[0].reference, entry.reference);
}

#[tokio::test]
async fn list_workspaces_in_grant_order() {
    let repos = repos().await;
    let owner = user(&repos).await;
    let other = user(&repos).await;
    let first = workspace(&repos, owner).await;
    let shared = workspace(&repos, other).await;
    let last = workspace(&repos, owner).await;
    workspaces::add_member(&repos, other, &shared, &owner.to_string())
        .await
        .unwrap();

    let listed: Vec<String> = workspaces::list_workspaces(&repos, owner)
        .await
        .unwrap()
        .iter()
        .map(|w| w.id.to_string())
        .collect();
    assert_eq!(listed, vec![first, last, shared]);
}

#[tokio::test]
async fn login_finds_user_by_email_and_checks_password() {
    let repos = repos().await;
    let email = format!("{}@Example.com", UserId::new());
    let registered = users::register(
        &repos,
        &NewUser {
            name: "Grace".to_string(),
            email: email.clone(),
            password_hash: auth::hash_password("correct horse").unwrap(),
        },
    )
    .await
    .unwrap();

    let found = users::find_by_email(&repos, &format!("  {}  ", email.to_lowercase()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, registered.id);
    assert!(auth::verify_password("correct horse", &found.password_hash).unwrap());
    assert!(!auth::verify_password("wrong horse", &found.password_hash).unwrap());

    let unknown = format!("{}@example.com", UserId::new());
    assert!(users::find_by_email(&repos, &unknown).await.unwrap().is_none());
}

//! Page use cases: creation inside the tree, renames and cascading deletes.

use leaflet_core::{Page, PageId, PageMeta, PagePath, UserId};
use leaflet_store::{NewPage, PageMetaPatch, PageUpdate, Repositories};

use super::{UseCaseError, UseCaseResult, member_page, require_member_page, require_member_workspace};

/// Input for [`create_page`].
#[derive(Debug, Clone, Default)]
pub struct CreatePage {
    pub title: String,
    pub icon: Option<String>,
    /// Parent page in the same workspace; `None` creates a root page.
    pub parent_id: Option<String>,
}

/// Create a page and index it in its workspace.
pub async fn create_page(
    repos: &Repositories,
    actor: UserId,
    workspace_id: &str,
    input: CreatePage,
) -> UseCaseResult<Page> {
    let workspace = require_member_workspace(repos, actor, workspace_id).await?;

    let path = match input.parent_id.as_deref() {
        None => None,
        Some(parent_id) => {
            let parent = repos
                .pages
                .get_by_id(parent_id)
                .await?
                .filter(|p| p.workspace_id == workspace.id)
                .ok_or_else(|| UseCaseError::NotFound("parent page".to_string()))?;
            Some(PagePath::child_of(parent.path.as_ref(), &parent.reference))
        }
    };

    let mut new_page = NewPage::new(workspace.id, input.title).with_icon(input.icon);
    if let Some(path) = path {
        new_page = new_page.with_path(path);
    }

    let page_id = repos.pages.create(&new_page).await?;
    let page = repos
        .pages
        .get_by_id(&page_id.to_string())
        .await?
        .ok_or_else(|| UseCaseError::Forbidden("could not read back the new page".to_string()))?;
    repos
        .workspaces
        .add_page(workspace_id, &PageMeta::from(&page))
        .await?;

    tracing::info!(
        page_id = %page.id,
        workspace_id,
        reference = %page.reference,
        root = page.is_root(),
        "Created page"
    );
    Ok(page)
}

/// Get a page. `Ok(None)` for a malformed or unknown id.
pub async fn get_page(
    repos: &Repositories,
    actor: UserId,
    page_id: &str,
) -> UseCaseResult<Option<Page>> {
    member_page(repos, actor, page_id).await
}

/// Every page below `page_id`, at any depth, from the workspace index.
pub async fn get_children(
    repos: &Repositories,
    actor: UserId,
    page_id: &str,
) -> UseCaseResult<Vec<PageMeta>> {
    let page = require_member_page(repos, actor, page_id).await?;
    repos
        .workspaces
        .get_children(&page.workspace_id.to_string(), page_id)
        .await?
        .ok_or_else(|| UseCaseError::NotFound("page index entry".to_string()))
}

/// Update body fields. A new icon is copied into the workspace index.
pub async fn update_page(
    repos: &Repositories,
    actor: UserId,
    page_id: &str,
    update: &PageUpdate,
) -> UseCaseResult<Page> {
    let page = require_member_page(repos, actor, page_id).await?;
    if update.is_empty() {
        return Ok(page);
    }

    repos.pages.update(page_id, update).await?;
    if update.icon.is_some() {
        let patch = PageMetaPatch {
            icon: update.icon.clone(),
            ..PageMetaPatch::default()
        };
        repos
            .workspaces
            .update_page_meta(&page.workspace_id.to_string(), page_id, &patch)
            .await?;
    }

    tracing::debug!(page_id, user_id = %actor, "Updated page");
    reload(repos, page_id).await
}

/// Rename a page.
///
/// The reference keeps its suffix and takes the new title's slug. The page
/// document is written first, then its workspace entry is patched in place.
/// When the reference changes, every descendant's path is rewritten in both
/// places so the subtree stays reachable.
pub async fn update_page_title(
    repos: &Repositories,
    actor: UserId,
    page_id: &str,
    title: &str,
) -> UseCaseResult<Page> {
    let page = require_member_page(repos, actor, page_id).await?;
    let workspace_id = page.workspace_id.to_string();
    let old_reference = page.reference.clone();
    let new_reference = old_reference.renamed(title);

    // Descendants are matched on the old reference.
    let descendants = repos
        .workspaces
        .get_children(&workspace_id, page_id)
        .await?
        .unwrap_or_default();

    repos.pages.update_title(page_id, title, &new_reference).await?;
    let indexed = repos
        .workspaces
        .update_page_meta(
            &workspace_id,
            page_id,
            &PageMetaPatch::rename(title, new_reference.clone()),
        )
        .await?;
    if !indexed {
        tracing::warn!(page_id, workspace_id = %workspace_id, "Renamed page has no workspace entry");
    }

    if new_reference != old_reference {
        for entry in &descendants {
            let Some(path) = &entry.path else { continue };
            let path = path.replace(&old_reference, &new_reference);
            let id = entry.page_id.to_string();
            repos.pages.set_path(&id, Some(&path)).await?;
            let patch = PageMetaPatch {
                path: Some(path),
                ..PageMetaPatch::default()
            };
            repos.workspaces.update_page_meta(&workspace_id, &id, &patch).await?;
        }
    }

    tracing::info!(
        page_id,
        reference = %new_reference,
        descendants = descendants.len(),
        "Renamed page"
    );
    reload(repos, page_id).await
}

/// Delete a page, its descendants and their workspace entries.
pub async fn delete_page(repos: &Repositories, actor: UserId, page_id: &str) -> UseCaseResult<()> {
    let page = require_member_page(repos, actor, page_id).await?;
    let workspace_id = page.workspace_id.to_string();

    let mut doomed: Vec<PageId> = vec![page.id];
    if let Some(descendants) = repos.workspaces.get_children(&workspace_id, page_id).await? {
        doomed.extend(descendants.iter().map(|e| e.page_id));
    }

    let deleted = repos.pages.delete_many(&doomed).await?;
    for id in &doomed {
        repos
            .workspaces
            .remove_page(&workspace_id, &id.to_string())
            .await?;
    }

    tracing::info!(page_id, workspace_id = %workspace_id, deleted, "Deleted page");
    Ok(())
}

async fn reload(repos: &Repositories, page_id: &str) -> UseCaseResult<Page> {
    repos
        .pages
        .get_by_id(page_id)
        .await?
        .ok_or_else(|| UseCaseError::NotFound("page".to_string()))
}

//! Workspace use cases.

use leaflet_core::{PageMeta, UserId, Workspace, WorkspaceId};
use leaflet_store::{NewPage, NewWorkspace, Repositories, WorkspaceUpdate};

use super::{UseCaseError, UseCaseResult, member_workspace, require_member_workspace};

/// Title of the page every new workspace starts with.
pub const DEFAULT_PAGE_TITLE: &str = "notion clone project";

fn validate_name(name: &str) -> UseCaseResult<()> {
    if name.trim().is_empty() {
        return Err(UseCaseError::Validation(
            "workspace name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Create a workspace owned by `actor`, seeded with one root page.
///
/// Steps, in order: insert the workspace, add the actor as member, link the
/// workspace into the actor's list, insert the default page, read it back
/// and index it in the workspace. A page that cannot be read back is
/// reported as [`UseCaseError::Forbidden`]; earlier writes are kept.
pub async fn create_workspace(
    repos: &Repositories,
    actor: UserId,
    input: &NewWorkspace,
) -> UseCaseResult<WorkspaceId> {
    validate_name(&input.name)?;

    let workspace_id = repos.workspaces.create(input).await?;
    let ws = workspace_id.to_string();
    let user = actor.to_string();

    repos.workspaces.add_member(&ws, &user).await?;
    repos.users.add_workspace(&user, &ws).await?;

    let page_id = repos
        .pages
        .create(&NewPage::new(workspace_id, DEFAULT_PAGE_TITLE))
        .await?;
    let page = repos
        .pages
        .get_by_id(&page_id.to_string())
        .await?
        .ok_or_else(|| {
            tracing::error!(workspace_id = %workspace_id, page_id = %page_id, "Default page vanished after insert");
            UseCaseError::Forbidden("could not read back the default page".to_string())
        })?;
    repos.workspaces.add_page(&ws, &PageMeta::from(&page)).await?;

    tracing::info!(workspace_id = %workspace_id, user_id = %actor, "Created workspace");
    Ok(workspace_id)
}

/// Get a workspace. `Ok(None)` for a malformed or unknown id.
pub async fn get_workspace_by_id(
    repos: &Repositories,
    actor: UserId,
    workspace_id: &str,
) -> UseCaseResult<Option<Workspace>> {
    member_workspace(repos, actor, workspace_id).await
}

/// Members of a workspace. `Ok(None)` for a malformed or unknown id.
pub async fn get_all_members_by_workspace_id(
    repos: &Repositories,
    actor: UserId,
    workspace_id: &str,
) -> UseCaseResult<Option<Vec<UserId>>> {
    Ok(member_workspace(repos, actor, workspace_id)
        .await?
        .map(|w| w.members))
}

/// Root pages of a workspace, in index order.
pub async fn get_root_pages(
    repos: &Repositories,
    actor: UserId,
    workspace_id: &str,
) -> UseCaseResult<Option<Vec<PageMeta>>> {
    if member_workspace(repos, actor, workspace_id).await?.is_none() {
        return Ok(None);
    }
    Ok(repos.workspaces.get_all_root_pages(workspace_id).await?)
}

/// Every workspace linked into the actor's user document.
pub async fn list_workspaces(repos: &Repositories, actor: UserId) -> UseCaseResult<Vec<Workspace>> {
    let user = repos
        .users
        .get_by_id(&actor.to_string())
        .await?
        .ok_or_else(|| UseCaseError::NotFound("user".to_string()))?;

    let ids: Vec<WorkspaceId> = user.workspaces.iter().map(|w| w.workspace_id).collect();
    Ok(repos.workspaces.get_many(&ids).await?)
}

pub async fn update_workspace(
    repos: &Repositories,
    actor: UserId,
    workspace_id: &str,
    update: &WorkspaceUpdate,
) -> UseCaseResult<Workspace> {
    if let Some(name) = &update.name {
        validate_name(name)?;
    }
    require_member_workspace(repos, actor, workspace_id).await?;

    if !update.is_empty() {
        repos.workspaces.update(workspace_id, update).await?;
        tracing::info!(workspace_id, user_id = %actor, "Updated workspace");
    }

    repos
        .workspaces
        .get_by_id(workspace_id)
        .await?
        .ok_or_else(|| UseCaseError::NotFound("workspace".to_string()))
}

/// Delete a workspace with all its pages and unlink it from every member.
pub async fn delete_workspace(
    repos: &Repositories,
    actor: UserId,
    workspace_id: &str,
) -> UseCaseResult<()> {
    let workspace = require_member_workspace(repos, actor, workspace_id).await?;

    let pages = repos.pages.delete_by_workspace(workspace_id).await?;
    for member in &workspace.members {
        repos
            .users
            .remove_workspace(&member.to_string(), workspace_id)
            .await?;
    }
    repos.workspaces.delete(workspace_id).await?;

    tracing::info!(
        workspace_id,
        user_id = %actor,
        pages,
        members = workspace.members.len(),
        "Deleted workspace"
    );
    Ok(())
}

/// Add an existing user to the workspace and link the workspace into their
/// list. Adding a current member changes nothing.
pub async fn add_member(
    repos: &Repositories,
    actor: UserId,
    workspace_id: &str,
    member_id: &str,
) -> UseCaseResult<()> {
    require_member_workspace(repos, actor, workspace_id).await?;
    let member = repos
        .users
        .get_by_id(member_id)
        .await?
        .ok_or_else(|| UseCaseError::NotFound("user".to_string()))?;

    repos.workspaces.add_member(workspace_id, member_id).await?;
    repos.users.add_workspace(member_id, workspace_id).await?;

    tracing::info!(workspace_id, member_id = %member.id, user_id = %actor, "Added member");
    Ok(())
}

/// Remove a member from both sides. Removing a non-member is a no-op.
pub async fn remove_member(
    repos: &Repositories,
    actor: UserId,
    workspace_id: &str,
    member_id: &str,
) -> UseCaseResult<()> {
    require_member_workspace(repos, actor, workspace_id).await?;

    repos.workspaces.remove_member(workspace_id, member_id).await?;
    repos.users.remove_workspace(member_id, workspace_id).await?;

    tracing::info!(workspace_id, member_id, user_id = %actor, "Removed member");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::testing::offline_repos;

    #[tokio::test]
    async fn test_blank_name_is_rejected_before_any_write() {
        let repos = offline_repos();
        let input = NewWorkspace {
            name: "   ".to_string(),
            icon: None,
        };
        let result = create_workspace(&repos, UserId::new(), &input).await;
        assert!(matches!(result, Err(UseCaseError::Validation(_))));
    }

    #[tokio::test]
    async fn test_invalid_id_reads_as_absent() {
        let repos = offline_repos();
        let actor = UserId::new();
        assert!(get_workspace_by_id(&repos, actor, "123").await.unwrap().is_none());
        assert!(
            get_all_members_by_workspace_id(&repos, actor, "123")
                .await
                .unwrap()
                .is_none()
        );
        assert!(get_root_pages(&repos, actor, "123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mutations_on_invalid_id_are_not_found() {
        let repos = offline_repos();
        let actor = UserId::new();
        let member = UserId::new().to_string();
        assert!(matches!(
            add_member(&repos, actor, "123", &member).await,
            Err(UseCaseError::NotFound(_))
        ));
        assert!(matches!(
            remove_member(&repos, actor, "123", &member).await,
            Err(UseCaseError::NotFound(_))
        ));
        assert!(matches!(
            delete_workspace(&repos, actor, "123").await,
            Err(UseCaseError::NotFound(_))
        ));
    }
}

//! User use cases: accounts, profiles and favorites.
//!
//! Password hashing and token issue stay in the HTTP layer; these functions
//! only see the stored hash.

use leaflet_core::{User, UserId, Workspace};
use leaflet_store::{NewUser, Repositories, UserUpdate};

use super::{UseCaseError, UseCaseResult, require_member_workspace};

fn validate_email(email: &str) -> UseCaseResult<()> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(UseCaseError::Validation(format!(
            "invalid email address: {email}"
        )));
    }
    Ok(())
}

/// Create an account. A taken email surfaces as `StoreError::DuplicateEmail`.
pub async fn register(repos: &Repositories, new_user: &NewUser) -> UseCaseResult<User> {
    if new_user.name.trim().is_empty() {
        return Err(UseCaseError::Validation("name must not be empty".to_string()));
    }
    validate_email(&new_user.email)?;

    let user_id = repos.users.create(new_user).await?;
    tracing::info!(user_id = %user_id, "Registered user");
    get_profile(repos, user_id).await
}

/// The user with this email, for credential checks.
pub async fn find_by_email(repos: &Repositories, email: &str) -> UseCaseResult<Option<User>> {
    Ok(repos.users.get_by_email(email.trim()).await?)
}

pub async fn get_profile(repos: &Repositories, actor: UserId) -> UseCaseResult<User> {
    repos
        .users
        .get_by_id(&actor.to_string())
        .await?
        .ok_or_else(|| UseCaseError::NotFound("user".to_string()))
}

pub async fn update_profile(
    repos: &Repositories,
    actor: UserId,
    update: &UserUpdate,
) -> UseCaseResult<User> {
    if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(UseCaseError::Validation("name must not be empty".to_string()));
    }
    if !repos.users.update(&actor.to_string(), update).await? {
        return Err(UseCaseError::NotFound("user".to_string()));
    }
    get_profile(repos, actor).await
}

/// Delete the account after removing the user from every workspace it
/// belongs to. Workspaces left without members are kept.
pub async fn delete_account(repos: &Repositories, actor: UserId) -> UseCaseResult<()> {
    let user = get_profile(repos, actor).await?;
    let user_id = actor.to_string();

    for access in &user.workspaces {
        repos
            .workspaces
            .remove_member(&access.workspace_id.to_string(), &user_id)
            .await?;
    }
    repos.users.delete(&user_id).await?;

    tracing::info!(user_id = %actor, workspaces = user.workspaces.len(), "Deleted account");
    Ok(())
}

/// Whether `page_id` names an existing page of `workspace`.
///
/// A page that lives in another workspace is rejected, so a favorite can
/// never reach outside the workspace the membership check covered.
async fn favorite_page_exists(
    repos: &Repositories,
    workspace: &Workspace,
    page_id: &str,
) -> UseCaseResult<bool> {
    match repos.pages.get_by_id(page_id).await? {
        Some(page) if page.workspace_id != workspace.id => Err(UseCaseError::Forbidden(
            "page belongs to another workspace".to_string(),
        )),
        Some(_) => Ok(true),
        None => Ok(false),
    }
}

/// Star a page in one of the actor's workspaces.
///
/// The favorite is recorded even for a page that does not exist; the page
/// is only marked with the actor's id when it does.
pub async fn add_favorite(
    repos: &Repositories,
    actor: UserId,
    workspace_id: &str,
    page_id: &str,
) -> UseCaseResult<()> {
    let workspace = require_member_workspace(repos, actor, workspace_id).await?;
    let page_exists = favorite_page_exists(repos, &workspace, page_id).await?;

    let linked = repos
        .users
        .add_favorite(&actor.to_string(), workspace_id, page_id)
        .await?;
    if !linked {
        return Err(UseCaseError::Forbidden(
            "workspace is not linked to this user".to_string(),
        ));
    }
    if page_exists {
        repos.pages.add_favorite_marker(page_id, actor).await?;
    }

    tracing::debug!(user_id = %actor, workspace_id, page_id, page_exists, "Added favorite");
    Ok(())
}

/// Unstar a page. Unstarring a page that was never starred is a no-op.
pub async fn remove_favorite(
    repos: &Repositories,
    actor: UserId,
    workspace_id: &str,
    page_id: &str,
) -> UseCaseResult<()> {
    let workspace = require_member_workspace(repos, actor, workspace_id).await?;
    let page_exists = favorite_page_exists(repos, &workspace, page_id).await?;

    repos
        .users
        .remove_favorite(&actor.to_string(), workspace_id, page_id)
        .await?;
    if page_exists {
        repos.pages.remove_favorite_marker(page_id, actor).await?;
    }

    tracing::debug!(user_id = %actor, workspace_id, page_id, "Removed favorite");
    Ok(())
}

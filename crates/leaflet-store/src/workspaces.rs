//! Workspace repository.
//!
//! A workspace row carries two embedded collections: the member set and the
//! page index. Every mutation of either is a single `UPDATE` on one row, so
//! concurrent writers to the same workspace never lose each other's changes.
//!
//! Identifiers arrive as strings. A string that is not a valid identifier
//! short-circuits before any query runs: lookups return `None`, mutations
//! return `false`.

use leaflet_core::{PageId, PageMeta, UserId, Workspace, WorkspaceId, children_of, root_pages};
use sqlx::types::Json;

use crate::Store;
use crate::error::StoreResult;
use crate::models::{
    NewWorkspace, PageMetaPatch, WORKSPACE_COLUMNS, WorkspaceRow, WorkspaceUpdate,
};

/// CRUD and structural mutations on the `workspaces` collection.
#[derive(Debug, Clone)]
pub struct WorkspaceRepository {
    store: Store,
}

impl WorkspaceRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Insert a new workspace and return its generated id. Names are not
    /// unique.
    pub async fn create(&self, data: &NewWorkspace) -> StoreResult<WorkspaceId> {
        let id = WorkspaceId::new();

        sqlx::query(
            r#"
            INSERT INTO workspaces (id, name, icon, created_at)
            VALUES ($1, $2, $3, NOW())
            "#,
        )
        .bind(id.0)
        .bind(&data.name)
        .bind(&data.icon)
        .execute(self.store.pool())
        .await?;

        tracing::debug!(workspace_id = %id, "Inserted workspace");
        Ok(id)
    }

    /// Add `member_id` to the member set. Adding an existing member is a
    /// no-op.
    ///
    /// When no workspace row exists for `workspace_id` one is created holding
    /// just this member.
    pub async fn add_member(&self, workspace_id: &str, member_id: &str) -> StoreResult<bool> {
        let (Some(workspace_id), Some(member_id)) =
            (WorkspaceId::parse(workspace_id), UserId::parse(member_id))
        else {
            return Ok(false);
        };

        sqlx::query(
            r#"
            INSERT INTO workspaces (id, members)
            VALUES ($1, jsonb_build_array($2::text))
            ON CONFLICT (id) DO UPDATE
            SET members = CASE
                WHEN workspaces.members @> jsonb_build_array($2::text) THEN workspaces.members
                ELSE workspaces.members || jsonb_build_array($2::text)
            END
            "#,
        )
        .bind(workspace_id.0)
        .bind(member_id.to_string())
        .execute(self.store.pool())
        .await?;

        Ok(true)
    }

    /// Append an entry to the page index unless an identical entry is
    /// already present.
    ///
    /// Equality is over the whole entry, not just `page_id`: an entry with
    /// the same page but a different title is appended. Use
    /// [`update_page_meta`](Self::update_page_meta) to change an entry.
    pub async fn add_page(&self, workspace_id: &str, entry: &PageMeta) -> StoreResult<bool> {
        let Some(workspace_id) = WorkspaceId::parse(workspace_id) else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE workspaces
            SET pages = CASE
                WHEN EXISTS (
                    SELECT 1 FROM jsonb_array_elements(pages) AS t(e) WHERE e = $2::jsonb
                ) THEN pages
                ELSE pages || jsonb_build_array($2::jsonb)
            END
            WHERE id = $1
            "#,
        )
        .bind(workspace_id.0)
        .bind(Json(entry))
        .execute(self.store.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// The member set, or `None` for an invalid or unknown workspace.
    pub async fn get_all_members(&self, workspace_id: &str) -> StoreResult<Option<Vec<UserId>>> {
        let Some(workspace_id) = WorkspaceId::parse(workspace_id) else {
            return Ok(None);
        };

        let row: Option<(Json<Vec<UserId>>,)> =
            sqlx::query_as(r#"SELECT members FROM workspaces WHERE id = $1"#)
                .bind(workspace_id.0)
                .fetch_optional(self.store.pool())
                .await?;

        Ok(row.map(|(members,)| members.0))
    }

    async fn page_index(&self, workspace_id: WorkspaceId) -> StoreResult<Option<Vec<PageMeta>>> {
        let row: Option<(Json<Vec<PageMeta>>,)> =
            sqlx::query_as(r#"SELECT pages FROM workspaces WHERE id = $1"#)
                .bind(workspace_id.0)
                .fetch_optional(self.store.pool())
                .await?;

        Ok(row.map(|(pages,)| pages.0))
    }

    /// Index entries of root-level pages (no path).
    pub async fn get_all_root_pages(&self, workspace_id: &str) -> StoreResult<Option<Vec<PageMeta>>> {
        let Some(workspace_id) = WorkspaceId::parse(workspace_id) else {
            return Ok(None);
        };

        Ok(self
            .page_index(workspace_id)
            .await?
            .map(|entries| root_pages(&entries)))
    }

    /// Index entries of every page below `page_id`.
    ///
    /// Resolves the page's reference from its own index entry, then keeps
    /// the entries whose path contains `/,<reference>,/`. `None` when the
    /// workspace is unknown or has no entry for the page.
    pub async fn get_children(
        &self,
        workspace_id: &str,
        page_id: &str,
    ) -> StoreResult<Option<Vec<PageMeta>>> {
        let (Some(workspace_id), Some(page_id)) =
            (WorkspaceId::parse(workspace_id), PageId::parse(page_id))
        else {
            return Ok(None);
        };

        Ok(self
            .page_index(workspace_id)
            .await?
            .and_then(|entries| children_of(&entries, page_id)))
    }

    pub async fn get_by_id(&self, workspace_id: &str) -> StoreResult<Option<Workspace>> {
        let Some(workspace_id) = WorkspaceId::parse(workspace_id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, WorkspaceRow>(&format!(
            "SELECT {WORKSPACE_COLUMNS} FROM workspaces WHERE id = $1"
        ))
        .bind(workspace_id.0)
        .fetch_optional(self.store.pool())
        .await?;

        Ok(row.map(Workspace::from))
    }

    /// Fetch several workspaces in the order of `ids`, skipping ids that no
    /// longer exist.
    pub async fn get_many(&self, ids: &[WorkspaceId]) -> StoreResult<Vec<Workspace>> {
        let ids: Vec<_> = ids.iter().map(|id| id.0).collect();

        let rows = sqlx::query_as::<_, WorkspaceRow>(&format!(
            "SELECT {WORKSPACE_COLUMNS} FROM workspaces \
             WHERE id = ANY($1) ORDER BY array_position($1, id)"
        ))
        .bind(ids)
        .fetch_all(self.store.pool())
        .await?;

        Ok(rows.into_iter().map(Workspace::from).collect())
    }

    /// Merge the set fields into the workspace and stamp `updated_at`.
    ///
    /// Creates the row when it does not exist, like
    /// [`add_member`](Self::add_member).
    pub async fn update(&self, workspace_id: &str, data: &WorkspaceUpdate) -> StoreResult<bool> {
        let Some(workspace_id) = WorkspaceId::parse(workspace_id) else {
            return Ok(false);
        };

        sqlx::query(
            r#"
            INSERT INTO workspaces (id, name, icon, updated_at)
            VALUES ($1, COALESCE($2, ''), $3, NOW())
            ON CONFLICT (id) DO UPDATE
            SET name = COALESCE($2, workspaces.name),
                icon = COALESCE($3, workspaces.icon),
                updated_at = NOW()
            "#,
        )
        .bind(workspace_id.0)
        .bind(&data.name)
        .bind(&data.icon)
        .execute(self.store.pool())
        .await?;

        Ok(true)
    }

    /// Overwrite fields of one page-index entry in place, keeping its
    /// position and every field the patch leaves unset.
    ///
    /// Returns `false` when the workspace has no entry for the page.
    pub async fn update_page_meta(
        &self,
        workspace_id: &str,
        page_id: &str,
        patch: &PageMetaPatch,
    ) -> StoreResult<bool> {
        let (Some(workspace_id), Some(page_id)) =
            (WorkspaceId::parse(workspace_id), PageId::parse(page_id))
        else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE workspaces
            SET pages = (
                SELECT jsonb_agg(
                    CASE WHEN e->>'pageId' = $2::text THEN e || $3::jsonb ELSE e END
                    ORDER BY i
                )
                FROM jsonb_array_elements(pages) WITH ORDINALITY AS t(e, i)
            )
            WHERE id = $1
            AND EXISTS (
                SELECT 1 FROM jsonb_array_elements(pages) AS t(e) WHERE e->>'pageId' = $2::text
            )
            "#,
        )
        .bind(workspace_id.0)
        .bind(page_id.to_string())
        .bind(Json(patch))
        .execute(self.store.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove `member_id` from the member set. Removing an absent member
    /// succeeds without changing anything; the return value only says
    /// whether the workspace exists.
    pub async fn remove_member(&self, workspace_id: &str, member_id: &str) -> StoreResult<bool> {
        let (Some(workspace_id), Some(member_id)) =
            (WorkspaceId::parse(workspace_id), UserId::parse(member_id))
        else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE workspaces
            SET members = COALESCE(
                (
                    SELECT jsonb_agg(e ORDER BY i)
                    FROM jsonb_array_elements(members) WITH ORDINALITY AS t(e, i)
                    WHERE e <> to_jsonb($2::text)
                ),
                '[]'::jsonb
            )
            WHERE id = $1
            "#,
        )
        .bind(workspace_id.0)
        .bind(member_id.to_string())
        .execute(self.store.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove every index entry for `page_id`.
    pub async fn remove_page(&self, workspace_id: &str, page_id: &str) -> StoreResult<bool> {
        let (Some(workspace_id), Some(page_id)) =
            (WorkspaceId::parse(workspace_id), PageId::parse(page_id))
        else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE workspaces
            SET pages = COALESCE(
                (
                    SELECT jsonb_agg(e ORDER BY i)
                    FROM jsonb_array_elements(pages) WITH ORDINALITY AS t(e, i)
                    WHERE e->>'pageId' IS DISTINCT FROM $2::text
                ),
                '[]'::jsonb
            )
            WHERE id = $1
            "#,
        )
        .bind(workspace_id.0)
        .bind(page_id.to_string())
        .execute(self.store.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete the workspace row. Pages and user links are left alone.
    pub async fn delete(&self, workspace_id: &str) -> StoreResult<bool> {
        let Some(workspace_id) = WorkspaceId::parse(workspace_id) else {
            return Ok(false);
        };

        let result = sqlx::query(r#"DELETE FROM workspaces WHERE id = $1"#)
            .bind(workspace_id.0)
            .execute(self.store.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

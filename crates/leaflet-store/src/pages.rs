//! Page repository.
//!
//! Pages are the source of truth for content. The reference is generated
//! here on insert; keeping the workspace page index in step is the caller's
//! job.

use leaflet_core::{Page, PageId, PagePath, Reference, UserId, WorkspaceId};

use crate::Store;
use crate::error::StoreResult;
use crate::models::{NewPage, PAGE_COLUMNS, PageRow, PageUpdate};

/// CRUD on the `pages` collection.
#[derive(Debug, Clone)]
pub struct PageRepository {
    store: Store,
}

impl PageRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Insert a page with a generated id and reference.
    pub async fn create(&self, data: &NewPage) -> StoreResult<PageId> {
        let id = PageId::new();
        let reference = Reference::for_title(&data.title);

        sqlx::query(
            r#"
            INSERT INTO pages (
                id, workspace_id, title, icon, cover_image,
                content, settings, reference, path, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
            "#,
        )
        .bind(id.0)
        .bind(data.workspace_id.0)
        .bind(&data.title)
        .bind(&data.icon)
        .bind(&data.cover_image)
        .bind(&data.content)
        .bind(&data.settings)
        .bind(reference.as_str())
        .bind(data.path.as_ref().map(PagePath::to_string))
        .execute(self.store.pool())
        .await?;

        tracing::debug!(page_id = %id, reference = %reference, "Inserted page");
        Ok(id)
    }

    pub async fn get_by_id(&self, page_id: &str) -> StoreResult<Option<Page>> {
        let Some(page_id) = PageId::parse(page_id) else {
            return Ok(None);
        };

        sqlx::query_as::<_, PageRow>(&format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = $1"))
            .bind(page_id.0)
            .fetch_optional(self.store.pool())
            .await?
            .map(Page::try_from)
            .transpose()
    }

    /// All pages of a workspace, oldest first.
    pub async fn get_by_workspace(&self, workspace_id: &str) -> StoreResult<Vec<Page>> {
        let Some(workspace_id) = WorkspaceId::parse(workspace_id) else {
            return Ok(Vec::new());
        };

        sqlx::query_as::<_, PageRow>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE workspace_id = $1 ORDER BY created_at"
        ))
        .bind(workspace_id.0)
        .fetch_all(self.store.pool())
        .await?
        .into_iter()
        .map(Page::try_from)
        .collect()
    }

    /// Merge body fields and stamp `updated_at`.
    pub async fn update(&self, page_id: &str, data: &PageUpdate) -> StoreResult<bool> {
        let Some(page_id) = PageId::parse(page_id) else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE pages
            SET icon = COALESCE($2, icon),
                cover_image = COALESCE($3, cover_image),
                content = COALESCE($4, content),
                settings = COALESCE($5, settings),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(page_id.0)
        .bind(&data.icon)
        .bind(&data.cover_image)
        .bind(&data.content)
        .bind(&data.settings)
        .execute(self.store.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update_title(
        &self,
        page_id: &str,
        title: &str,
        reference: &Reference,
    ) -> StoreResult<bool> {
        let Some(page_id) = PageId::parse(page_id) else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE pages
            SET title = $2, reference = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(page_id.0)
        .bind(title)
        .bind(reference.as_str())
        .execute(self.store.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_path(&self, page_id: &str, path: Option<&PagePath>) -> StoreResult<bool> {
        let Some(page_id) = PageId::parse(page_id) else {
            return Ok(false);
        };

        let result = sqlx::query(r#"UPDATE pages SET path = $2, updated_at = NOW() WHERE id = $1"#)
            .bind(page_id.0)
            .bind(path.map(PagePath::to_string))
            .execute(self.store.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Mark the page as starred by `user_id`. Set semantics.
    pub async fn add_favorite_marker(&self, page_id: &str, user_id: UserId) -> StoreResult<bool> {
        let Some(page_id) = PageId::parse(page_id) else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE pages
            SET favorites = CASE
                WHEN favorites @> jsonb_build_array($2::text) THEN favorites
                ELSE favorites || jsonb_build_array($2::text)
            END
            WHERE id = $1
            "#,
        )
        .bind(page_id.0)
        .bind(user_id.to_string())
        .execute(self.store.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn remove_favorite_marker(
        &self,
        page_id: &str,
        user_id: UserId,
    ) -> StoreResult<bool> {
        let Some(page_id) = PageId::parse(page_id) else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE pages
            SET favorites = COALESCE(
                (
                    SELECT jsonb_agg(e ORDER BY i)
                    FROM jsonb_array_elements(favorites) WITH ORDINALITY AS t(e, i)
                    WHERE e <> to_jsonb($2::text)
                ),
                '[]'::jsonb
            )
            WHERE id = $1
            "#,
        )
        .bind(page_id.0)
        .bind(user_id.to_string())
        .execute(self.store.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, page_id: &str) -> StoreResult<bool> {
        let Some(page_id) = PageId::parse(page_id) else {
            return Ok(false);
        };

        let result = sqlx::query(r#"DELETE FROM pages WHERE id = $1"#)
            .bind(page_id.0)
            .execute(self.store.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a batch of pages; returns how many rows went away.
    pub async fn delete_many(&self, page_ids: &[PageId]) -> StoreResult<u64> {
        if page_ids.is_empty() {
            return Ok(0);
        }
        let ids: Vec<_> = page_ids.iter().map(|id| id.0).collect();

        let result = sqlx::query(r#"DELETE FROM pages WHERE id = ANY($1)"#)
            .bind(ids)
            .execute(self.store.pool())
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_by_workspace(&self, workspace_id: &str) -> StoreResult<u64> {
        let Some(workspace_id) = WorkspaceId::parse(workspace_id) else {
            return Ok(0);
        };

        let result = sqlx::query(r#"DELETE FROM pages WHERE workspace_id = $1"#)
            .bind(workspace_id.0)
            .execute(self.store.pool())
            .await?;

        Ok(result.rows_affected())
    }
}

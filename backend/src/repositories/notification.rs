use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::error::AppError;
use crate::models::notification::Notification;
use crate::types::NotificationId;

const SELECT_COLUMNS: &str = "id, message, action, link_url, recipient, status_read, read_on, \
     created_by, created_at, updated_at, deleted_at";

#[derive(Debug, Default, Clone, Copy)]
pub struct NotificationRepository;

impl NotificationRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(
        &self,
        conn: &mut PgConnection,
        item: &Notification,
    ) -> Result<Notification, AppError> {
        let query = format!(
            "INSERT INTO notifications (id, message, action, link_url, recipient, status_read, \
             read_on, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {}",
            SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Notification>(&query)
            .bind(item.id)
            .bind(&item.message)
            .bind(&item.action)
            .bind(&item.link_url)
            .bind(&item.recipient)
            .bind(item.status_read)
            .bind(item.read_on)
            .bind(&item.created_by)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(conn)
            .await?;
        Ok(row)
    }

    pub async fn list_active_for_recipient(
        &self,
        db: &PgPool,
        recipient: &str,
    ) -> Result<Vec<Notification>, AppError> {
        let query = format!(
            "SELECT {} FROM notifications WHERE recipient = $1 AND deleted_at IS NULL \
             ORDER BY created_at DESC, id DESC",
            SELECT_COLUMNS
        );
        let rows = sqlx::query_as::<_, Notification>(&query)
            .bind(recipient)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    pub async fn find_active_by_id(
        &self,
        db: &PgPool,
        id: NotificationId,
    ) -> Result<Option<Notification>, AppError> {
        let query = format!(
            "SELECT {} FROM notifications WHERE id = $1 AND deleted_at IS NULL",
            SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }

    /// Marks the notification read, overwriting `read_on` on every call.
    pub async fn mark_read(
        &self,
        db: &PgPool,
        id: NotificationId,
        timestamp: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET status_read = TRUE, read_on = $2, updated_at = $2 \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(timestamp)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }
}

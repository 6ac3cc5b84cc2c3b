//! Ticket repository.
//!
//! Every read except [`TicketRepository::purge_deleted_before`] is restricted
//! to active rows (`deleted_at IS NULL`). Writes that belong to a lifecycle
//! operation take the operation's transaction connection.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};

use crate::error::AppError;
use crate::models::ticket::{Ticket, TicketStatus};
use crate::types::TicketId;

const TABLE: &str = "tickets";
const SELECT_COLUMNS: &str = "id, title, description, assignee, due_date, created_by, \
     updated_by, status, created_at, updated_at, deleted_at";

#[derive(Debug, Default, Clone, Copy)]
pub struct TicketRepository;

impl TicketRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_active_by_id(
        &self,
        db: &PgPool,
        id: TicketId,
    ) -> Result<Option<Ticket>, AppError> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1 AND deleted_at IS NULL",
            SELECT_COLUMNS, TABLE
        );
        let row = sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }

    pub async fn list_active_by_creator(
        &self,
        db: &PgPool,
        created_by: &str,
    ) -> Result<Vec<Ticket>, AppError> {
        let query = format!(
            "SELECT {} FROM {} WHERE created_by = $1 AND deleted_at IS NULL \
             ORDER BY created_at DESC, id DESC",
            SELECT_COLUMNS, TABLE
        );
        let rows = sqlx::query_as::<_, Ticket>(&query)
            .bind(created_by)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    /// Loads an active ticket and holds its row lock until the transaction ends.
    pub async fn lock_active_by_id(
        &self,
        conn: &mut PgConnection,
        id: TicketId,
    ) -> Result<Option<Ticket>, AppError> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
            SELECT_COLUMNS, TABLE
        );
        let row = sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(row)
    }

    pub async fn create(&self, conn: &mut PgConnection, item: &Ticket) -> Result<Ticket, AppError> {
        let query = format!(
            "INSERT INTO {} (id, title, description, assignee, due_date, created_by, updated_by, \
             status, created_at, updated_at, deleted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NULL) \
             RETURNING {}",
            TABLE, SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Ticket>(&query)
            .bind(item.id)
            .bind(&item.title)
            .bind(&item.description)
            .bind(&item.assignee)
            .bind(item.due_date)
            .bind(&item.created_by)
            .bind(&item.updated_by)
            .bind(item.status)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(conn)
            .await?;
        Ok(row)
    }

    /// Overwrites the editable fields. `created_by` is never part of an update.
    pub async fn update_details(
        &self,
        conn: &mut PgConnection,
        id: TicketId,
        title: &str,
        description: &str,
        assignee: Option<&str>,
        due_date: Option<NaiveDate>,
        timestamp: DateTime<Utc>,
    ) -> Result<Ticket, AppError> {
        let query = format!(
            "UPDATE {} SET title = $2, description = $3, assignee = $4, due_date = $5, \
             updated_at = $6 WHERE id = $1 AND deleted_at IS NULL RETURNING {}",
            TABLE, SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(title)
            .bind(description)
            .bind(assignee)
            .bind(due_date)
            .bind(timestamp)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Ticket not found.".into()))?;
        Ok(row)
    }

    pub async fn update_assignment(
        &self,
        conn: &mut PgConnection,
        id: TicketId,
        assignee: &str,
        due_date: Option<NaiveDate>,
        timestamp: DateTime<Utc>,
    ) -> Result<Ticket, AppError> {
        let query = format!(
            "UPDATE {} SET assignee = $2, due_date = $3, updated_at = $4 \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {}",
            TABLE, SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(assignee)
            .bind(due_date)
            .bind(timestamp)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Ticket not found.".into()))?;
        Ok(row)
    }

    /// Moves the ticket to `next` only while it is still in `expected`.
    ///
    /// Returns `None` when the row changed underneath the caller.
    pub async fn update_status(
        &self,
        conn: &mut PgConnection,
        id: TicketId,
        expected: TicketStatus,
        next: TicketStatus,
        updated_by: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<Ticket>, AppError> {
        let query = format!(
            "UPDATE {} SET status = $3, updated_by = $4, updated_at = $5 \
             WHERE id = $1 AND status = $2 AND deleted_at IS NULL RETURNING {}",
            TABLE, SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(expected)
            .bind(next)
            .bind(updated_by)
            .bind(timestamp)
            .fetch_optional(conn)
            .await?;
        Ok(row)
    }

    pub async fn soft_delete(
        &self,
        conn: &mut PgConnection,
        id: TicketId,
        timestamp: DateTime<Utc>,
    ) -> Result<Ticket, AppError> {
        let query = format!(
            "UPDATE {} SET deleted_at = $2, updated_at = $2 \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {}",
            TABLE, SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(timestamp)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Ticket not found.".into()))?;
        Ok(row)
    }

    /// Physically removes tickets soft-deleted before `cutoff`, together with their logs.
    pub async fn purge_deleted_before(
        &self,
        db: &PgPool,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let query = format!(
            "DELETE FROM {} WHERE deleted_at IS NOT NULL AND deleted_at < $1",
            TABLE
        );
        let result = sqlx::query(&query).bind(cutoff).execute(db).await?;
        Ok(result.rows_affected())
    }
}

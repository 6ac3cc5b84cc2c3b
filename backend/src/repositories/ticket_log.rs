//! Append-only storage for ticket audit entries.
//!
//! There is no update or delete here; rows only disappear when the
//! owning ticket is purged (`ON DELETE CASCADE`).

use sqlx::{PgConnection, PgPool};

use crate::models::ticket_log::TicketLog;
use crate::types::TicketId;

pub async fn insert_ticket_log(conn: &mut PgConnection, log: &TicketLog) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO ticket_logs (id, ticket_id, action, description, performed_by, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $6)",
    )
    .bind(log.id)
    .bind(log.ticket_id)
    .bind(&log.action)
    .bind(&log.description)
    .bind(&log.performed_by)
    .bind(log.created_at)
    .execute(conn)
    .await
    .map(|_| ())
}

pub async fn list_ticket_logs(
    pool: &PgPool,
    ticket_id: TicketId,
) -> Result<Vec<TicketLog>, sqlx::Error> {
    sqlx::query_as::<_, TicketLog>(
        "SELECT id, ticket_id, action, description, performed_by, created_at \
         FROM ticket_logs WHERE ticket_id = $1 AND deleted_at IS NULL \
         ORDER BY created_at ASC, id ASC",
    )
    .bind(ticket_id)
    .fetch_all(pool)
    .await
}

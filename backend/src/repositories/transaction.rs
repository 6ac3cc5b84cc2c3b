//! Transaction helpers shared by the lifecycle services.

use sqlx::postgres::PgTransaction;
use sqlx::PgPool;

use crate::error::AppError;

/// Begin a transaction for one lifecycle operation.
///
/// Dropping the handle without [`commit_transaction`] rolls every write back.
pub async fn begin_transaction(db: &PgPool) -> Result<PgTransaction<'static>, AppError> {
    db.begin()
        .await
        .map_err(|e| AppError::InternalServerError(e.into()))
}

pub async fn commit_transaction(tx: PgTransaction<'_>) -> Result<(), AppError> {
    tx.commit()
        .await
        .map_err(|e| AppError::InternalServerError(e.into()))
}

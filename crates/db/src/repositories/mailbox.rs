//! Per-profile mailbox of cancellation notices. Notices are durable the
//! moment they are enqueued and are consumed destructively by the next
//! dashboard view.

use slotbook_core::errors::SlotResult;
use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

use crate::db_err;

/// Appends one notice to a profile's mailbox. Takes any executor so
/// cancellation transactions can enqueue atomically with their deletes.
pub async fn enqueue<'e>(
    executor: impl PgExecutor<'e>,
    owner_id: Uuid,
    body: &str,
) -> SlotResult<()> {
    tracing::debug!("Enqueueing notice for profile {}", owner_id);

    sqlx::query(
        r#"
        INSERT INTO notices (owner_id, body)
        VALUES ($1, $2)
        "#,
    )
    .bind(owner_id)
    .bind(body)
    .execute(executor)
    .await
    .map_err(db_err)?;

    Ok(())
}

/// Reads and clears the mailbox in a single statement. The delete returns
/// exactly the rows it removed, so a notice enqueued concurrently either
/// makes this drain or survives intact for the next one.
pub async fn drain_all(pool: &Pool<Postgres>, owner_id: Uuid) -> SlotResult<Vec<String>> {
    let mut rows: Vec<(i64, String)> = sqlx::query_as(
        r#"
        DELETE FROM notices
        WHERE owner_id = $1
        RETURNING seq, body
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    // RETURNING carries no ordering guarantee; restore FIFO by seq
    rows.sort_by_key(|(seq, _)| *seq);

    Ok(rows.into_iter().map(|(_, body)| body).collect())
}

/// Discards a removed profile's undrained notices.
pub async fn clear<'e>(executor: impl PgExecutor<'e>, owner_id: Uuid) -> SlotResult<()> {
    sqlx::query(
        r#"
        DELETE FROM notices
        WHERE owner_id = $1
        "#,
    )
    .bind(owner_id)
    .execute(executor)
    .await
    .map_err(db_err)?;

    Ok(())
}

use slotbook_core::errors::SlotResult;
use slotbook_core::models::profile::Role;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::db_err;
use crate::models::DbAccount;

pub async fn find_by_username(
    pool: &Pool<Postgres>,
    username: &str,
) -> SlotResult<Option<DbAccount>> {
    let account = sqlx::query_as::<_, DbAccount>(
        r#"
        SELECT id, username, password_hash, created_at
        FROM accounts
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .map_err(db_err)?;

    Ok(account)
}

/// Resolves the account's role tag from whichever profile table references
/// it. Resolved once at authentication time; callers pass the explicit
/// `Role` onward instead of re-probing per operation.
pub async fn resolve_role(pool: &Pool<Postgres>, account_id: Uuid) -> SlotResult<Option<Role>> {
    let tag = sqlx::query_scalar::<_, Option<String>>(
        r#"
        SELECT CASE
            WHEN EXISTS (SELECT 1 FROM admin_profiles WHERE account_id = $1) THEN 'administrator'
            WHEN EXISTS (SELECT 1 FROM provider_profiles WHERE account_id = $1) THEN 'provider'
            WHEN EXISTS (SELECT 1 FROM user_profiles WHERE account_id = $1) THEN 'end_user'
        END
        "#,
    )
    .bind(account_id)
    .fetch_one(pool)
    .await
    .map_err(db_err)?;

    let role = match tag.as_deref() {
        Some("administrator") => Some(Role::Administrator),
        Some("provider") => Some(Role::Provider),
        Some("end_user") => Some(Role::EndUser),
        _ => None,
    };

    if role.is_none() {
        tracing::debug!("Account {} has no profile; role unresolved", account_id);
    }

    Ok(role)
}

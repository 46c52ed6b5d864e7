use chrono::{NaiveDate, NaiveTime};
use slotbook_core::errors::{SlotError, SlotResult};
use slotbook_core::models::profile::Category;
use slotbook_core::notices;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::db_err;
use crate::models::{DbAccount, DbProviderProfile, DbUserProfile};
use crate::repositories::mailbox;

/// Creates the account and its end-user profile together. The uniqueness
/// check and both inserts share one transaction.
pub async fn register_user(
    pool: &Pool<Postgres>,
    username: &str,
    password_hash: &str,
    first_name: &str,
    last_name: &str,
) -> SlotResult<(DbAccount, DbUserProfile)> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    let account = insert_account(&mut tx, username, password_hash).await?;

    let profile = sqlx::query_as::<_, DbUserProfile>(
        r#"
        INSERT INTO user_profiles (account_id, first_name, last_name)
        VALUES ($1, $2, $3)
        RETURNING id, account_id, first_name, last_name, created_at
        "#,
    )
    .bind(account.id)
    .bind(first_name)
    .bind(last_name)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;

    tracing::debug!("Registered user account: username={}", username);
    Ok((account, profile))
}

/// Creates the account and its provider profile together. Category is
/// fixed at registration; no edit path exists.
pub async fn register_provider(
    pool: &Pool<Postgres>,
    username: &str,
    password_hash: &str,
    first_name: &str,
    last_name: &str,
    category: Category,
    qualifications: &str,
) -> SlotResult<(DbAccount, DbProviderProfile)> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    let account = insert_account(&mut tx, username, password_hash).await?;

    let profile = sqlx::query_as::<_, DbProviderProfile>(
        r#"
        INSERT INTO provider_profiles (account_id, category, first_name, last_name, qualifications)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, account_id, category, first_name, last_name, qualifications, created_at
        "#,
    )
    .bind(account.id)
    .bind(category.as_str())
    .bind(first_name)
    .bind(last_name)
    .bind(qualifications)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;

    tracing::debug!(
        "Registered provider account: username={}, category={}",
        username,
        category
    );
    Ok((account, profile))
}

async fn insert_account(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    username: &str,
    password_hash: &str,
) -> SlotResult<DbAccount> {
    let taken = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (SELECT 1 FROM accounts WHERE username = $1)
        "#,
    )
    .bind(username)
    .fetch_one(&mut **tx)
    .await
    .map_err(db_err)?;

    if taken {
        return Err(SlotError::Validation("Username already exists.".to_string()));
    }

    sqlx::query_as::<_, DbAccount>(
        r#"
        INSERT INTO accounts (username, password_hash)
        VALUES ($1, $2)
        RETURNING id, username, password_hash, created_at
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .fetch_one(&mut **tx)
    .await
    .map_err(db_err)
}

pub async fn find_user_by_account(
    pool: &Pool<Postgres>,
    account_id: Uuid,
) -> SlotResult<Option<DbUserProfile>> {
    let profile = sqlx::query_as::<_, DbUserProfile>(
        r#"
        SELECT id, account_id, first_name, last_name, created_at
        FROM user_profiles
        WHERE account_id = $1
        "#,
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await
    .map_err(db_err)?;

    Ok(profile)
}

pub async fn find_provider_by_account(
    pool: &Pool<Postgres>,
    account_id: Uuid,
) -> SlotResult<Option<DbProviderProfile>> {
    let profile = sqlx::query_as::<_, DbProviderProfile>(
        r#"
        SELECT id, account_id, category, first_name, last_name, qualifications, created_at
        FROM provider_profiles
        WHERE account_id = $1
        "#,
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await
    .map_err(db_err)?;

    Ok(profile)
}

pub async fn find_provider_by_id(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
) -> SlotResult<Option<DbProviderProfile>> {
    let profile = sqlx::query_as::<_, DbProviderProfile>(
        r#"
        SELECT id, account_id, category, first_name, last_name, qualifications, created_at
        FROM provider_profiles
        WHERE id = $1
        "#,
    )
    .bind(provider_id)
    .fetch_optional(pool)
    .await
    .map_err(db_err)?;

    Ok(profile)
}

pub async fn list_users(pool: &Pool<Postgres>) -> SlotResult<Vec<DbUserProfile>> {
    let users = sqlx::query_as::<_, DbUserProfile>(
        r#"
        SELECT id, account_id, first_name, last_name, created_at
        FROM user_profiles
        ORDER BY last_name ASC, first_name ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    Ok(users)
}

pub async fn list_providers(pool: &Pool<Postgres>) -> SlotResult<Vec<DbProviderProfile>> {
    let providers = sqlx::query_as::<_, DbProviderProfile>(
        r#"
        SELECT id, account_id, category, first_name, last_name, qualifications, created_at
        FROM provider_profiles
        ORDER BY last_name ASC, first_name ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    Ok(providers)
}

/// Administrator moderation: removes an account together with its profile
/// and scheduling state. Removing a provider deletes their slots and
/// notifies booked users; removing an end user deletes their bookings and
/// reopens the affected slots so the booked flag never outlives the
/// booking.
pub async fn delete_account(pool: &Pool<Postgres>, username: &str) -> SlotResult<()> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    let account = sqlx::query_as::<_, DbAccount>(
        r#"
        SELECT id, username, password_hash, created_at
        FROM accounts
        WHERE username = $1
        FOR UPDATE
        "#,
    )
    .bind(username)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?
    .ok_or_else(|| SlotError::NotFound(format!("Account '{}' not found", username)))?;

    let is_admin = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (SELECT 1 FROM admin_profiles WHERE account_id = $1)
        "#,
    )
    .bind(account.id)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?;

    if is_admin {
        return Err(SlotError::Forbidden(
            "Administrator accounts cannot be removed".to_string(),
        ));
    }

    let provider = sqlx::query_as::<_, DbProviderProfile>(
        r#"
        SELECT id, account_id, category, first_name, last_name, qualifications, created_at
        FROM provider_profiles
        WHERE account_id = $1
        "#,
    )
    .bind(account.id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?;

    if let Some(provider) = provider {
        // Notify every booked user before their slot disappears
        let booked: Vec<(String, NaiveDate, NaiveTime, NaiveTime, Uuid)> = sqlx::query_as(
            r#"
            SELECT s.appointment_name, s.date, s.start_time, s.end_time, u.id
            FROM appointment_slots s
            JOIN bookings b ON b.slot_id = s.id
            JOIN user_profiles u ON u.id = b.user_id
            WHERE s.provider_id = $1
            "#,
        )
        .bind(provider.id)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_err)?;

        for (appointment_name, date, start, end, user_profile_id) in booked {
            let body = notices::canceled_by_admin_for_user(
                &appointment_name,
                &provider.display_name(),
                date,
                start,
                end,
            );
            mailbox::enqueue(&mut *tx, user_profile_id, &body).await?;
        }

        // Bookings go with their slots via cascade
        sqlx::query(
            r#"
            DELETE FROM appointment_slots
            WHERE provider_id = $1
            "#,
        )
        .bind(provider.id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        mailbox::clear(&mut *tx, provider.id).await?;
    } else if let Some(user) = find_user_in_tx(&mut tx, account.id).await? {
        // Reopen everything the user had booked, then drop the bookings
        sqlx::query(
            r#"
            UPDATE appointment_slots
            SET is_booked = FALSE
            WHERE id IN (SELECT slot_id FROM bookings WHERE user_id = $1)
            "#,
        )
        .bind(user.id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        sqlx::query(
            r#"
            DELETE FROM bookings
            WHERE user_id = $1
            "#,
        )
        .bind(user.id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        mailbox::clear(&mut *tx, user.id).await?;
    }

    // Profiles cascade from the account row
    sqlx::query(
        r#"
        DELETE FROM accounts
        WHERE id = $1
        "#,
    )
    .bind(account.id)
    .execute(&mut *tx)
    .await
    .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;

    tracing::debug!("Removed account: username={}", username);
    Ok(())
}

async fn find_user_in_tx(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    account_id: Uuid,
) -> SlotResult<Option<DbUserProfile>> {
    let profile = sqlx::query_as::<_, DbUserProfile>(
        r#"
        SELECT id, account_id, first_name, last_name, created_at
        FROM user_profiles
        WHERE account_id = $1
        "#,
    )
    .bind(account_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(db_err)?;

    Ok(profile)
}

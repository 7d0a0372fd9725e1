use anyhow::Context;
use uuid::Uuid;

// Advisory locks are scoped to the Postgres session. Used as a best-effort
// guard against two document analyses running at once for the same user.
const LOCK_NAMESPACE: i64 = 0x4649_4E4F_5343_4F50; // "FINOSCOP" as hex-ish namespace.

fn lock_key_for_user(user_id: Uuid) -> i64 {
    let bits = user_id.as_u128();
    LOCK_NAMESPACE ^ ((bits as i64) ^ ((bits >> 64) as i64))
}

pub async fn try_acquire_user_lock(pool: &sqlx::PgPool, user_id: Uuid) -> anyhow::Result<bool> {
    let key = lock_key_for_user(user_id);
    let acquired: (bool,) = sqlx::query_as("SELECT pg_try_advisory_lock($1)")
        .persistent(false)
        .bind(key)
        .fetch_one(pool)
        .await
        .with_context(|| format!("failed to acquire advisory lock (key={key})"))?;
    Ok(acquired.0)
}

pub async fn release_user_lock(pool: &sqlx::PgPool, user_id: Uuid) -> anyhow::Result<()> {
    let key = lock_key_for_user(user_id);
    sqlx::query("SELECT pg_advisory_unlock($1)")
        .persistent(false)
        .bind(key)
        .execute(pool)
        .await
        .with_context(|| format!("failed to release advisory lock (key={key})"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_key_is_stable_per_user() {
        let user = Uuid::parse_str("0e4f3a94-9c1f-4f7a-9b6e-0c7a6d3e2b10").unwrap();
        assert_eq!(lock_key_for_user(user), lock_key_for_user(user));
    }

    #[test]
    fn distinct_users_get_distinct_keys() {
        let a = Uuid::parse_str("0e4f3a94-9c1f-4f7a-9b6e-0c7a6d3e2b10").unwrap();
        let b = Uuid::parse_str("7d2c1b30-5a8e-4e19-8f4d-2b9c8a7f6e5d").unwrap();
        assert_ne!(lock_key_for_user(a), lock_key_for_user(b));
    }
}

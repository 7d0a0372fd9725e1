use anyhow::Context;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// Audit trail for document analyses: one row per attempt, whatever the
/// outcome, with the raw provider response when one was received.
pub async fn record_analysis_run(
    pool: &sqlx::PgPool,
    user_id: Uuid,
    file_path: &str,
    provider: &str,
    status: &str,
    error: Option<&str>,
    raw_response: Option<Value>,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    let generated_at: DateTime<Utc> = Utc::now();

    sqlx::query(
        "INSERT INTO document_analysis_runs (id, user_id, file_path, generated_at, provider, status, error, raw_response) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .persistent(false)
    .bind(id)
    .bind(user_id)
    .bind(file_path)
    .bind(generated_at)
    .bind(provider)
    .bind(status)
    .bind(error)
    .bind(raw_response)
    .execute(pool)
    .await
    .context("insert document_analysis_runs failed")?;

    Ok(id)
}

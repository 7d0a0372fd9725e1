use crate::domain::financials::FinancialRecord;
use anyhow::Context;
use uuid::Uuid;

type RecordRow = (i32, f64, f64, f64, f64, f64, String);

fn row_into_record(row: RecordRow) -> FinancialRecord {
    let (year, revenue, fixed_costs, variable_costs, payroll, cash_flow, notes) = row;
    FinancialRecord {
        year,
        revenue,
        fixed_costs,
        variable_costs,
        payroll,
        cash_flow,
        notes,
    }
}

/// Records are append-only per (user, year); a new submission for an existing
/// year is a conflict, surfaced to the caller via `is_unique_violation`.
pub async fn insert_record(
    pool: &sqlx::PgPool,
    user_id: Uuid,
    record: &FinancialRecord,
) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO financial_data (user_id, year, revenue, fixed_costs, variable_costs, payroll, cash_flow, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING id",
    )
    .bind(user_id)
    .bind(record.year)
    .bind(record.revenue)
    .bind(record.fixed_costs)
    .bind(record.variable_costs)
    .bind(record.payroll)
    .bind(record.cash_flow)
    .bind(&record.notes)
    .fetch_one(pool)
    .await
    .context("insert financial_data failed")?;

    Ok(id)
}

pub async fn fetch_all(pool: &sqlx::PgPool, user_id: Uuid) -> anyhow::Result<Vec<FinancialRecord>> {
    let rows = sqlx::query_as::<_, RecordRow>(
        "SELECT year, revenue, fixed_costs, variable_costs, payroll, cash_flow, notes \
         FROM financial_data \
         WHERE user_id = $1 \
         ORDER BY year DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("select financial_data failed")?;

    Ok(rows.into_iter().map(row_into_record).collect())
}

pub async fn fetch_latest(
    pool: &sqlx::PgPool,
    user_id: Uuid,
) -> anyhow::Result<Option<FinancialRecord>> {
    let row = sqlx::query_as::<_, RecordRow>(
        "SELECT year, revenue, fixed_costs, variable_costs, payroll, cash_flow, notes \
         FROM financial_data \
         WHERE user_id = $1 \
         ORDER BY year DESC \
         LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("select latest financial_data failed")?;

    Ok(row.map(row_into_record))
}

pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

use crate::domain::profile::{CompanyProfile, FiscalRegime, Sector};
use anyhow::Context;
use uuid::Uuid;

pub async fn upsert_profile(
    pool: &sqlx::PgPool,
    user_id: Uuid,
    profile: &CompanyProfile,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO company_profiles (user_id, company_name, sector, employee_count, annual_revenue, fiscal_regime, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, now()) \
         ON CONFLICT (user_id) DO UPDATE \
           SET company_name = EXCLUDED.company_name, \
               sector = EXCLUDED.sector, \
               employee_count = EXCLUDED.employee_count, \
               annual_revenue = EXCLUDED.annual_revenue, \
               fiscal_regime = EXCLUDED.fiscal_regime, \
               updated_at = now()",
    )
    .bind(user_id)
    .bind(&profile.company_name)
    .bind(profile.sector.map(Sector::label))
    .bind(profile.employee_count)
    .bind(profile.annual_revenue)
    .bind(profile.fiscal_regime.map(FiscalRegime::label))
    .execute(pool)
    .await
    .context("upsert company_profiles failed")?;

    Ok(())
}

pub async fn fetch_profile(
    pool: &sqlx::PgPool,
    user_id: Uuid,
) -> anyhow::Result<Option<CompanyProfile>> {
    let row = sqlx::query_as::<_, (String, Option<String>, i32, f64, Option<String>)>(
        "SELECT company_name, sector, employee_count, annual_revenue, fiscal_regime \
         FROM company_profiles \
         WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("select company_profiles failed")?;

    let Some((company_name, sector, employee_count, annual_revenue, fiscal_regime)) = row else {
        return Ok(None);
    };

    // Unknown labels written by older clients degrade to "no sector", which
    // routes the rule engine to the default benchmark.
    Ok(Some(CompanyProfile {
        company_name,
        sector: sector.as_deref().and_then(Sector::from_label),
        employee_count,
        annual_revenue,
        fiscal_regime: fiscal_regime.as_deref().and_then(FiscalRegime::from_label),
    }))
}

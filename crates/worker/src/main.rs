use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

mod analyze;

#[derive(Debug, Parser)]
#[command(name = "finoscope_worker")]
struct Args {
    /// Owner of the document; used for the single-flight lock and as the
    /// key for saved records.
    #[arg(long)]
    user_id: Uuid,

    /// Path of the PDF inside the documents bucket.
    #[arg(long)]
    file_path: String,

    /// Fiscal year used when the extraction falls back. Defaults to the
    /// current year (Paris time).
    #[arg(long)]
    year: Option<String>,

    /// Insert the extracted figures as a financial record once validated.
    #[arg(long)]
    save: bool,

    /// Download and analyze, but skip every database write.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = finoscope_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let fallback_year =
        finoscope_core::time::fiscal::resolve_fiscal_year(args.year.as_deref(), chrono::Utc::now())?;

    if args.dry_run {
        let analysis =
            analyze::analyze_document(&settings, &args.file_path, fallback_year).await?;
        tracing::info!(
            user_id = %args.user_id,
            file_path = %args.file_path,
            extracted = analysis.was_extracted(),
            year = analysis.record.year,
            revenue = analysis.record.revenue,
            dry_run = true,
            "document analysis (dry-run)"
        );
        return Ok(());
    }

    let db_url = settings.require_database_url()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await
        .context("connect DATABASE_URL failed")?;

    finoscope_core::storage::migrate(&pool).await?;

    let acquired =
        finoscope_core::storage::lock::try_acquire_user_lock(&pool, args.user_id).await?;
    if !acquired {
        tracing::warn!(user_id = %args.user_id, "user lock not acquired; another analysis in progress");
        return Ok(());
    }

    let result = analyze::run(
        &pool,
        &settings,
        args.user_id,
        &args.file_path,
        fallback_year,
        args.save,
    )
    .await;

    let _ = finoscope_core::storage::lock::release_user_lock(&pool, args.user_id).await;

    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(user_id = %args.user_id, error = %err, "document analysis run failed");
    }
    result
}

fn init_sentry(settings: &finoscope_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use finoscope_core::auth::{AuthClient, AuthUser, Session};
use finoscope_core::documents::DocumentStore;
use finoscope_core::domain::financials::{FinancialRecord, UnvalidatedFinancialRecord};
use finoscope_core::domain::profile::{CompanyProfile, UnvalidatedCompanyProfile};
use finoscope_core::domain::ratios::Ratios;
use finoscope_core::domain::recommendation::Recommendation;
use finoscope_core::extract::openai::OpenAiClient;
use finoscope_core::extract::{DocumentAnalysis, ExtractionClient};
use finoscope_core::{engine, storage, time};

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

    let pool: Option<PgPool> = match settings.require_database_url() {
        Ok(db_url) => match sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await
        {
            Ok(pool) => match storage::migrate(&pool).await {
                Ok(()) => Some(pool),
                Err(e) => {
                    sentry_anyhow::capture_anyhow(&e);
                    tracing::error!(error = %e, "db migrations failed; starting API in degraded mode");
                    None
                }
            },
            Err(e) => {
                let err = anyhow::Error::new(e);
                sentry_anyhow::capture_anyhow(&err);
                tracing::error!(error = %err, "db connect failed; starting API in degraded mode");
                None
            }
        },
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "DATABASE_URL missing; starting API in degraded mode");
            None
        }
    };

    let auth = match AuthClient::from_settings(&settings) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!(error = %e, "auth provider not configured; auth routes disabled");
            None
        }
    };

    let docs = match DocumentStore::from_settings(&settings) {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!(error = %e, "object store not configured; document analysis disabled");
            None
        }
    };

    let extractor = if settings.openai_api_key.is_some() {
        Some(OpenAiClient::from_settings(&settings)?)
    } else {
        tracing::warn!("OPENAI_API_KEY missing; document analysis will use the fallback");
        None
    };

    let state = AppState {
        pool,
        auth,
        docs,
        extractor,
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
        .route("/auth/signout", post(signout))
        .route("/profile", get(get_profile).put(put_profile))
        .route("/financials", get(list_financials).post(create_financial))
        .route("/dashboard", get(dashboard))
        .route("/recommendations", get(recommendations))
        .route("/documents", post(upload_document))
        .route("/documents/analyze", post(analyze_document))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Clone)]
struct AppState {
    pool: Option<PgPool>,
    auth: Option<AuthClient>,
    docs: Option<DocumentStore>,
    extractor: Option<OpenAiClient>,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolve the caller through the auth provider. Every data route goes
/// through here; the user id is the only tenancy key in the system.
async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, StatusCode> {
    let Some(auth) = &state.auth else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };
    let Some(token) = bearer_token(headers) else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    match auth.current_user(token).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(StatusCode::UNAUTHORIZED),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "auth provider lookup failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn require_pool(state: &AppState) -> Result<&PgPool, StatusCode> {
    state.pool.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)
}

fn internal_error(e: anyhow::Error) -> StatusCode {
    sentry_anyhow::capture_anyhow(&e);
    tracing::error!(error = %e, "request failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

#[derive(Debug, Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn signup(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let Some(auth) = &state.auth else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    match auth.sign_up(&creds.email, &creds.password).await {
        Ok(body) => Ok(Json(body)),
        Err(e) => {
            tracing::warn!(error = %e, "signup rejected");
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

async fn signin(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<Json<Session>, StatusCode> {
    let Some(auth) = &state.auth else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    match auth.sign_in(&creds.email, &creds.password).await {
        Ok(session) => Ok(Json(session)),
        Err(e) => {
            tracing::warn!(error = %e, "sign-in rejected");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

async fn signout(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode, StatusCode> {
    let Some(auth) = &state.auth else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };
    let Some(token) = bearer_token(&headers) else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    auth.sign_out(token).await.map_err(internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CompanyProfile>, StatusCode> {
    let user = require_user(&state, &headers).await?;
    let pool = require_pool(&state)?;

    let profile = storage::profiles::fetch_profile(pool, user.id)
        .await
        .map_err(internal_error)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(profile))
}

async fn put_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<UnvalidatedCompanyProfile>,
) -> Result<Json<CompanyProfile>, StatusCode> {
    let user = require_user(&state, &headers).await?;
    let pool = require_pool(&state)?;

    let profile = match input.validate_and_into_profile() {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(error = %e, "profile rejected");
            return Err(StatusCode::UNPROCESSABLE_ENTITY);
        }
    };

    storage::profiles::upsert_profile(pool, user.id, &profile)
        .await
        .map_err(internal_error)?;

    Ok(Json(profile))
}

async fn list_financials(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<FinancialRecord>>, StatusCode> {
    let user = require_user(&state, &headers).await?;
    let pool = require_pool(&state)?;

    let records = storage::financials::fetch_all(pool, user.id)
        .await
        .map_err(internal_error)?;

    Ok(Json(records))
}

#[derive(Debug, Serialize)]
struct CreatedRecord {
    id: Uuid,
    record: FinancialRecord,
}

async fn create_financial(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<UnvalidatedFinancialRecord>,
) -> Result<(StatusCode, Json<CreatedRecord>), StatusCode> {
    let user = require_user(&state, &headers).await?;
    let pool = require_pool(&state)?;

    let record = match input.validate_and_into_record() {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(error = %e, "financial record rejected");
            return Err(StatusCode::UNPROCESSABLE_ENTITY);
        }
    };

    let id = match storage::financials::insert_record(pool, user.id, &record).await {
        Ok(id) => id,
        Err(e) if storage::financials::is_unique_violation(&e) => {
            tracing::warn!(user_id = %user.id, year = record.year, "duplicate fiscal year");
            return Err(StatusCode::CONFLICT);
        }
        Err(e) => return Err(internal_error(e)),
    };

    Ok((StatusCode::CREATED, Json(CreatedRecord { id, record })))
}

#[derive(Debug, Serialize)]
struct YearPoint {
    year: i32,
    revenue: f64,
    total_costs: f64,
    cash_flow: f64,
}

#[derive(Debug, Serialize)]
struct DashboardResponse {
    latest: FinancialRecord,
    ratios: Ratios,
    series: Vec<YearPoint>,
}

async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardResponse>, StatusCode> {
    let user = require_user(&state, &headers).await?;
    let pool = require_pool(&state)?;

    let records = storage::financials::fetch_all(pool, user.id)
        .await
        .map_err(internal_error)?;
    let Some(latest) = records.first().cloned() else {
        return Err(StatusCode::NOT_FOUND);
    };

    let ratios = Ratios::compute(&latest).map_err(internal_error)?;

    // Oldest first, the way the evolution chart consumes it.
    let series = records
        .iter()
        .rev()
        .map(|r| YearPoint {
            year: r.year,
            revenue: r.revenue,
            total_costs: r.fixed_costs + r.variable_costs + r.payroll,
            cash_flow: r.cash_flow,
        })
        .collect();

    Ok(Json(DashboardResponse {
        latest,
        ratios,
        series,
    }))
}

#[derive(Debug, Serialize)]
struct RecommendationsResponse {
    recommendations: Vec<Recommendation>,
}

async fn recommendations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RecommendationsResponse>, StatusCode> {
    let user = require_user(&state, &headers).await?;
    let pool = require_pool(&state)?;

    let Some(record) = storage::financials::fetch_latest(pool, user.id)
        .await
        .map_err(internal_error)?
    else {
        // No data yet: an empty list, not an error.
        return Ok(Json(RecommendationsResponse {
            recommendations: vec![],
        }));
    };

    let profile = storage::profiles::fetch_profile(pool, user.id)
        .await
        .map_err(internal_error)?;

    let recommendations =
        engine::generate_recommendations(&record, profile.as_ref()).map_err(internal_error)?;

    Ok(Json(RecommendationsResponse { recommendations }))
}

#[derive(Debug, Serialize)]
struct UploadedDocument {
    file_path: String,
}

/// Stash an uploaded PDF in the object store under a generated per-user
/// path; the returned path is what `/documents/analyze` expects.
async fn upload_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<(StatusCode, Json<UploadedDocument>), StatusCode> {
    let user = require_user(&state, &headers).await?;
    let Some(docs) = &state.docs else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    if body.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let file_path = format!("{}/{}.pdf", user.id, Uuid::new_v4());
    docs.upload(&file_path, body.to_vec(), "application/pdf")
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(UploadedDocument { file_path })))
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    file_path: String,
}

#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    success: bool,
    /// False when the figures are a placeholder rather than read from the
    /// document; `success` only means the request itself was handled.
    extracted: bool,
    data: UnvalidatedFinancialRecord,
    message: String,
}

async fn analyze_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, StatusCode> {
    let user = require_user(&state, &headers).await?;
    let Some(docs) = &state.docs else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let file_path = req.file_path.trim();
    if file_path.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let pdf_bytes = match docs.download(file_path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, %user.id, file_path, "document download failed");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let year = time::fiscal::current_fiscal_year(chrono::Utc::now()).map_err(internal_error)?;

    let (analysis, raw_response, error_detail) = match &state.extractor {
        None => (DocumentAnalysis::fallback_unavailable(year), None, None),
        Some(client) => match client.extract_financials(&pdf_bytes).await {
            Ok(record) => {
                let raw = serde_json::to_value(&record).ok();
                (DocumentAnalysis::extracted(record), raw, None)
            }
            Err(e) => {
                sentry_anyhow::capture_anyhow(&e);
                tracing::warn!(error = %e, %user.id, file_path, "extraction failed; falling back");
                let raw = e
                    .downcast_ref::<finoscope_core::extract::error::ExtractionDiagnosticsError>()
                    .and_then(|diag| diag.raw_response_json.clone());
                (
                    DocumentAnalysis::fallback_failed(year),
                    raw,
                    Some(format!("{e:#}")),
                )
            }
        },
    };

    // Best-effort audit trail; the analysis result is returned regardless.
    if let Some(pool) = &state.pool {
        let status = if analysis.was_extracted() {
            "extracted"
        } else {
            "fallback"
        };
        if let Err(e) = storage::analysis_runs::record_analysis_run(
            pool,
            user.id,
            file_path,
            "openai",
            status,
            error_detail.as_deref(),
            raw_response,
        )
        .await
        {
            tracing::warn!(error = %e, "failed to record analysis run");
        }
    }

    Ok(Json(AnalyzeResponse {
        success: true,
        extracted: analysis.was_extracted(),
        data: analysis.record,
        message: analysis.message,
    }))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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

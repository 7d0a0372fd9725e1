use anyhow::Context;
use finoscope_core::config::Settings;
use finoscope_core::documents::DocumentStore;
use finoscope_core::extract::error::ExtractionDiagnosticsError;
use finoscope_core::extract::openai::OpenAiClient;
use finoscope_core::extract::{DocumentAnalysis, ExtractionClient};
use finoscope_core::storage;
use uuid::Uuid;

/// Download the document and run one extraction attempt, without touching
/// the database. The fallback analysis stands in when no API key is
/// configured or the provider call fails.
pub async fn analyze_document(
    settings: &Settings,
    file_path: &str,
    fallback_year: i32,
) -> anyhow::Result<DocumentAnalysis> {
    let (analysis, _raw, _error) = analyze_document_with_raw(settings, file_path, fallback_year).await?;
    Ok(analysis)
}

pub async fn analyze_document_with_raw(
    settings: &Settings,
    file_path: &str,
    fallback_year: i32,
) -> anyhow::Result<(DocumentAnalysis, Option<serde_json::Value>, Option<String>)> {
    let docs = DocumentStore::from_settings(settings)?;
    let pdf_bytes = docs
        .download(file_path)
        .await
        .with_context(|| format!("failed to download document {file_path}"))?;

    if settings.openai_api_key.is_none() {
        tracing::warn!(file_path, "no extraction key configured; using fallback");
        return Ok((DocumentAnalysis::fallback_unavailable(fallback_year), None, None));
    }

    let client = OpenAiClient::from_settings(settings)?;
    match client.extract_financials(&pdf_bytes).await {
        Ok(record) => {
            let raw = serde_json::to_value(&record).ok();
            Ok((DocumentAnalysis::extracted(record), raw, None))
        }
        Err(err) => {
            tracing::warn!(file_path, error = %err, "extraction failed; using fallback");
            let raw = err
                .downcast_ref::<ExtractionDiagnosticsError>()
                .and_then(|diag| diag.raw_response_json.clone());
            Ok((
                DocumentAnalysis::fallback_failed(fallback_year),
                raw,
                Some(format!("{err:#}")),
            ))
        }
    }
}

/// Full worker run: analyze, record the audit row, optionally save the
/// validated record.
pub async fn run(
    pool: &sqlx::PgPool,
    settings: &Settings,
    user_id: Uuid,
    file_path: &str,
    fallback_year: i32,
    save: bool,
) -> anyhow::Result<()> {
    let (analysis, raw_response, error_detail) =
        analyze_document_with_raw(settings, file_path, fallback_year).await?;

    let status = if analysis.was_extracted() {
        "extracted"
    } else {
        "fallback"
    };

    let run_id = storage::analysis_runs::record_analysis_run(
        pool,
        user_id,
        file_path,
        "openai",
        status,
        error_detail.as_deref(),
        raw_response,
    )
    .await?;

    tracing::info!(%user_id, %run_id, status, "recorded document analysis run");

    if !save {
        return Ok(());
    }

    if !analysis.was_extracted() {
        tracing::warn!(%user_id, "fallback analysis is a placeholder; nothing to save");
        return Ok(());
    }

    match analysis.record.validate_and_into_record() {
        Ok(record) => {
            match storage::financials::insert_record(pool, user_id, &record).await {
                Ok(record_id) => {
                    tracing::info!(%user_id, %record_id, year = record.year, "saved extracted financial record");
                }
                Err(e) if storage::financials::is_unique_violation(&e) => {
                    tracing::warn!(%user_id, year = record.year, "record for this year already exists; not overwritten");
                }
                Err(e) => return Err(e),
            }
        }
        Err(e) => {
            tracing::warn!(%user_id, error = %e, "extracted figures failed validation; not saved");
        }
    }

    Ok(())
}

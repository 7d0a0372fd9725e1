use crate::extract::Provider;
use serde_json::Value;
use std::fmt;

/// Carries enough of the raw exchange to debug a failed extraction without
/// re-running it.
#[derive(Debug, Clone)]
pub struct ExtractionDiagnosticsError {
    pub provider: Provider,
    pub stage: &'static str,
    pub detail: String,
    pub raw_output: Option<String>,
    pub raw_response_json: Option<Value>,
}

impl fmt::Display for ExtractionDiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "extraction error (provider={:?}, stage={}): {}",
            self.provider, self.stage, self.detail
        )
    }
}

impl std::error::Error for ExtractionDiagnosticsError {}

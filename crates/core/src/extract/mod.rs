pub mod error;
pub mod json;
pub mod openai;

use crate::domain::financials::UnvalidatedFinancialRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    /// Figures actually read out of the document by the model.
    Extracted,
    /// Placeholder figures; the analysis did not happen or failed. Callers
    /// must not present these as extracted data.
    Fallback,
}

/// Outcome of one document analysis. The fallback is an explicit status, not
/// a success in disguise: downstream code can always tell whether the
/// numbers came from the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub status: ExtractionStatus,
    pub record: UnvalidatedFinancialRecord,
    pub message: String,
}

impl DocumentAnalysis {
    pub fn was_extracted(&self) -> bool {
        self.status == ExtractionStatus::Extracted
    }

    pub fn extracted(record: UnvalidatedFinancialRecord) -> DocumentAnalysis {
        DocumentAnalysis {
            status: ExtractionStatus::Extracted,
            record,
            message: "Document analysé avec succès. Veuillez vérifier les informations extraites."
                .to_string(),
        }
    }

    /// No extraction client is configured.
    pub fn fallback_unavailable(year: i32) -> DocumentAnalysis {
        DocumentAnalysis {
            status: ExtractionStatus::Fallback,
            record: placeholder_record(
                year,
                "Analyse automatique indisponible. Données à compléter manuellement.",
            ),
            message: "Analyse automatique indisponible : aucune clé API configurée. \
                      Veuillez saisir les données manuellement."
                .to_string(),
        }
    }

    /// The extraction call was made but failed.
    pub fn fallback_failed(year: i32) -> DocumentAnalysis {
        DocumentAnalysis {
            status: ExtractionStatus::Fallback,
            record: placeholder_record(
                year,
                "L'analyse automatique a rencontré une erreur. Veuillez saisir les données manuellement.",
            ),
            message: "Impossible d'analyser automatiquement le document. \
                      Veuillez saisir les données manuellement."
                .to_string(),
        }
    }
}

fn placeholder_record(year: i32, notes: &str) -> UnvalidatedFinancialRecord {
    UnvalidatedFinancialRecord {
        year,
        revenue: 0.0,
        fixed_costs: 0.0,
        variable_costs: 0.0,
        payroll: 0.0,
        cash_flow: 0.0,
        notes: notes.to_string(),
    }
}

#[async_trait::async_trait]
pub trait ExtractionClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// Best-effort single attempt: no retry, no repair loop. The caller
    /// decides whether a failure becomes a fallback analysis.
    async fn extract_financials(
        &self,
        pdf_bytes: &[u8],
    ) -> anyhow::Result<UnvalidatedFinancialRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_all_zero_and_flagged() {
        let analysis = DocumentAnalysis::fallback_unavailable(2024);
        assert!(!analysis.was_extracted());
        assert_eq!(analysis.record.year, 2024);
        assert_eq!(analysis.record.revenue, 0.0);
        assert_eq!(analysis.record.cash_flow, 0.0);
        assert!(!analysis.record.notes.is_empty());
    }

    #[test]
    fn failure_fallback_keeps_distinct_message() {
        let unavailable = DocumentAnalysis::fallback_unavailable(2024);
        let failed = DocumentAnalysis::fallback_failed(2024);
        assert_ne!(unavailable.message, failed.message);
        assert_eq!(failed.status, ExtractionStatus::Fallback);
    }
}

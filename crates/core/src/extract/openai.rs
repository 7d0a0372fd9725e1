use crate::config::Settings;
use crate::domain::financials::UnvalidatedFinancialRecord;
use crate::extract::error::ExtractionDiagnosticsError;
use crate::extract::json;
use crate::extract::{ExtractionClient, Provider};
use anyhow::Context;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const TEMPERATURE: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_openai_api_key()?.to_string();
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let max_tokens = std::env::var("OPENAI_MAX_TOKENS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);

        let timeout_secs = std::env::var("OPENAI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            http,
            api_key,
            base_url,
            model,
            max_tokens,
        })
    }

    async fn create_completion(
        &self,
        req: ChatCompletionRequest,
    ) -> anyhow::Result<(serde_json::Value, ChatCompletionResponse)> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );

        let url = format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let res = self
            .http
            .post(url)
            .headers(headers)
            .json(&req)
            .send()
            .await
            .context("OpenAI request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read OpenAI response body")?;
        if !status.is_success() {
            let raw_response_json = serde_json::from_str::<serde_json::Value>(&text).ok();
            return Err(ExtractionDiagnosticsError {
                provider: Provider::OpenAi,
                stage: "http",
                detail: format!("status={status}"),
                raw_output: Some(text),
                raw_response_json,
            }
            .into());
        }

        let raw_json = serde_json::from_str::<serde_json::Value>(&text)
            .with_context(|| format!("failed to parse OpenAI response JSON: {text}"))?;
        let parsed = serde_json::from_value::<ChatCompletionResponse>(raw_json.clone())
            .context("failed to decode OpenAI response into ChatCompletionResponse")?;
        Ok((raw_json, parsed))
    }

    fn analysis_prompt() -> String {
        [
            "Tu es un expert comptable français. Analyse cette liasse fiscale PDF et extrais les données financières suivantes au format JSON strict :",
            "",
            "{",
            "  \"year\": nombre (année de l'exercice fiscal, ex: 2024),",
            "  \"revenue\": nombre (chiffre d'affaires en euros),",
            "  \"fixed_costs\": nombre (charges fixes en euros),",
            "  \"variable_costs\": nombre (charges variables en euros),",
            "  \"payroll\": nombre (masse salariale en euros),",
            "  \"cash_flow\": nombre (trésorerie disponible en euros),",
            "  \"notes\": \"texte (observations importantes sur les données)\"",
            "}",
            "",
            "Instructions importantes :",
            "- Retourne UNIQUEMENT le JSON, sans texte additionnel",
            "- Tous les montants doivent être en euros (nombres décimaux)",
            "- Si une donnée n'est pas trouvée, mets 0",
            "- Pour year, extrais l'année fiscale du document",
            "- Le chiffre d'affaires correspond au CA total HT",
            "- Les charges fixes incluent : loyers, assurances, amortissements",
            "- Les charges variables incluent : achats de marchandises, sous-traitance",
            "- La masse salariale inclut salaires + charges sociales",
            "- La trésorerie correspond à la trésorerie nette disponible",
            "",
            "Analyse le document PDF et retourne uniquement le JSON.",
        ]
        .join("\n")
    }

    fn document_data_url(pdf_bytes: &[u8]) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(pdf_bytes);
        format!("data:application/pdf;base64,{encoded}")
    }

    fn response_text(res: &ChatCompletionResponse) -> anyhow::Result<String> {
        let choice = res
            .choices
            .first()
            .context("OpenAI response contains no choices")?;
        choice
            .message
            .content
            .clone()
            .context("OpenAI response message has no content")
    }

    /// Same as the trait method but also returns the raw provider response,
    /// so callers can persist it for the audit trail.
    pub async fn extract_financials_with_raw(
        &self,
        pdf_bytes: &[u8],
    ) -> anyhow::Result<(UnvalidatedFinancialRecord, serde_json::Value)> {
        let req = ChatCompletionRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: TEMPERATURE,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: Self::analysis_prompt(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: Self::document_data_url(pdf_bytes),
                        },
                    },
                ],
            }],
        };

        let (raw_json, res) = self.create_completion(req).await?;
        let text = Self::response_text(&res)?;

        match json::parse_financials(&text) {
            Ok(record) => Ok((record, raw_json)),
            Err(err) => Err(ExtractionDiagnosticsError {
                provider: Provider::OpenAi,
                stage: "parse",
                detail: format!("{err:#}"),
                raw_output: Some(text),
                raw_response_json: Some(raw_json),
            }
            .into()),
        }
    }
}

#[async_trait::async_trait]
impl ExtractionClient for OpenAiClient {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn extract_financials(
        &self,
        pdf_bytes: &[u8],
    ) -> anyhow::Result<UnvalidatedFinancialRecord> {
        let (record, _raw) = self.extract_financials_with_raw(pdf_bytes).await?;
        Ok(record)
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_completion_response_content() {
        let raw = json!({
            "id": "chatcmpl-1",
            "choices": [
                {
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": "{\"year\": 2024, \"revenue\": 480000}"
                    },
                    "finish_reason": "stop"
                }
            ]
        });

        let res: ChatCompletionResponse = serde_json::from_value(raw).unwrap();
        let text = OpenAiClient::response_text(&res).unwrap();
        let record = json::parse_financials(&text).unwrap();
        assert_eq!(record.year, 2024);
        assert_eq!(record.revenue, 480_000.0);
    }

    #[test]
    fn rejects_response_without_choices() {
        let res: ChatCompletionResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(OpenAiClient::response_text(&res).is_err());
    }

    #[test]
    fn document_data_url_is_pdf_prefixed() {
        let url = OpenAiClient::document_data_url(b"%PDF-1.4");
        assert!(url.starts_with("data:application/pdf;base64,"));
        let encoded = url.trim_start_matches("data:application/pdf;base64,");
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        assert_eq!(decoded, b"%PDF-1.4");
    }
}

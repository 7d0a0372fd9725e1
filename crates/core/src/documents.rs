use crate::config::Settings;
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BUCKET: &str = "documents";

/// Thin adapter over the hosted object store; only used to fetch and stash
/// uploaded PDFs.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

impl DocumentStore {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url = settings.require_supabase_url()?.to_string();
        let api_key = settings.require_supabase_service_role_key()?.to_string();

        let bucket = std::env::var("DOCUMENTS_BUCKET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BUCKET.to_string());

        let timeout_secs = std::env::var("SUPABASE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build object store http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
            bucket,
        })
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bucket,
            path.trim_start_matches('/'),
        )
    }

    fn headers(&self) -> anyhow::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(&self.api_key)?);
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        Ok(headers)
    }

    pub async fn download(&self, path: &str) -> anyhow::Result<Vec<u8>> {
        let res = self
            .http
            .get(self.object_url(path))
            .headers(self.headers()?)
            .send()
            .await
            .context("object store download request failed")?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("object store download HTTP {status} for {path}: {text}");
        }

        let bytes = res
            .bytes()
            .await
            .context("failed to read object store response body")?;
        Ok(bytes.to_vec())
    }

    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<()> {
        let mut headers = self.headers()?;
        headers.insert("content-type", HeaderValue::from_str(content_type)?);
        headers.insert("x-upsert", HeaderValue::from_static("true"));

        let res = self
            .http
            .post(self.object_url(path))
            .headers(headers)
            .body(bytes)
            .send()
            .await
            .context("object store upload request failed")?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("object store upload HTTP {status} for {path}: {text}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(base_url: &str) -> DocumentStore {
        DocumentStore {
            http: reqwest::Client::new(),
            base_url: base_url.to_string(),
            api_key: "key".to_string(),
            bucket: "documents".to_string(),
        }
    }

    #[test]
    fn object_url_joins_cleanly() {
        let s = store("https://proj.supabase.co/");
        assert_eq!(
            s.object_url("/user-1/liasse.pdf"),
            "https://proj.supabase.co/storage/v1/object/documents/user-1/liasse.pdf"
        );
        assert_eq!(
            s.object_url("user-1/liasse.pdf"),
            "https://proj.supabase.co/storage/v1/object/documents/user-1/liasse.pdf"
        );
    }
}

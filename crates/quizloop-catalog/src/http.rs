//! Catalog served over HTTP.
//!
//! The catalog is a folder URL such as `https://example.org/Quizzes`. The
//! manifest lives at `<base>/quizzes.json`; when the server also renders a
//! directory index at `<base>/`, CSV links found there are offered too.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tracing::instrument;

use crate::catalog::{
    check_file_name, merge_entries, parse_manifest, CatalogEntry, QuizCatalog, MANIFEST_FILE,
};
use crate::error::CatalogError;
use crate::listing::extract_csv_links;

/// A catalog behind a web server.
pub struct HttpCatalog {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs: timeout.as_secs(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> CatalogError {
        if e.is_timeout() {
            CatalogError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            CatalogError::Unreachable(format!("{} ({e})", self.base_url))
        } else {
            CatalogError::Unreachable(e.to_string())
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, CatalogError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(CatalogError::HttpStatus {
                status,
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    async fn fetch_manifest(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let url = format!("{}/{MANIFEST_FILE}", self.base_url);
        match self.get(&url).await {
            Ok(response) => {
                let body = response.text().await.map_err(|e| self.map_send_error(e))?;
                Ok(parse_manifest(&body))
            }
            Err(e @ CatalogError::HttpStatus { .. }) => {
                tracing::debug!("no manifest: {e}");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_listing(&self) -> Result<Vec<String>, CatalogError> {
        let url = format!("{}/", self.base_url);
        let response = match self.get(&url).await {
            Ok(response) => response,
            Err(e @ CatalogError::HttpStatus { .. }) => {
                tracing::debug!("no directory listing: {e}");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"));
        if !is_html {
            return Ok(Vec::new());
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        Ok(extract_csv_links(&body))
    }
}

#[async_trait]
impl QuizCatalog for HttpCatalog {
    fn name(&self) -> &str {
        &self.base_url
    }

    /// Manifest and listing are fetched concurrently. Either one failing on
    /// its own leaves the other's entries; both failing is an error.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn list(&self) -> anyhow::Result<Vec<CatalogEntry>> {
        let (manifest, listing) =
            futures::future::join(self.fetch_manifest(), self.fetch_listing()).await;

        match (manifest, listing) {
            (Err(e), Err(_)) => Err(e.into()),
            (manifest, listing) => {
                let manifest = manifest.unwrap_or_else(|e| {
                    tracing::warn!("skipping manifest: {e}");
                    Vec::new()
                });
                let listing = listing.unwrap_or_else(|e| {
                    tracing::warn!("skipping directory listing: {e}");
                    Vec::new()
                });
                Ok(merge_entries(manifest, listing))
            }
        }
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch(&self, file: &str) -> anyhow::Result<String> {
        check_file_name(file)?;
        let url = format!("{}/{}", self.base_url, urlencoding::encode(file));
        let response = match self.get(&url).await {
            Err(CatalogError::HttpStatus { status: 404, .. }) => {
                return Err(CatalogError::NotFound(file.to_string()).into())
            }
            other => other?,
        };
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        Ok(body)
    }
}

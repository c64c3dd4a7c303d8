// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Loading of TLS material from local files or HTTPS URLs.

use crate::error::{ReconcilerError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, instrument};
use url::Url;

/// Source of trust material and key pairs
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch_local(&self, path: &str) -> Result<Bytes>;

    /// Fetch a document over HTTPS. Plain HTTP is refused.
    async fn fetch_https(&self, url: &Url) -> Result<Bytes>;
}

/// Reads files with tokio and downloads with reqwest
#[derive(Debug, Clone)]
pub struct DefaultFetcher {
    http: reqwest::Client,
}

impl DefaultFetcher {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            ReconcilerError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;
        Ok(Self { http })
    }
}

#[async_trait]
impl DocumentFetcher for DefaultFetcher {
    #[instrument(skip(self))]
    async fn fetch_local(&self, path: &str) -> Result<Bytes> {
        let contents = tokio::fs::read(path).await.map_err(|e| {
            ReconcilerError::Configuration(format!("Failed to read {}: {}", path, e))
        })?;
        debug!("Read {} bytes from {}", contents.len(), path);
        Ok(Bytes::from(contents))
    }

    #[instrument(skip(self), fields(url = %url))]
    async fn fetch_https(&self, url: &Url) -> Result<Bytes> {
        if url.scheme() != "https" {
            return Err(ReconcilerError::Configuration(format!(
                "Insecure fetch of trust material refused: {} is not an https:// URL",
                url
            )));
        }

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ReconcilerError::Configuration(format!("Failed to fetch {}: {}", url, e)))?;

        let body = response.bytes().await.map_err(|e| {
            ReconcilerError::Configuration(format!("Failed to read response from {}: {}", url, e))
        })?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

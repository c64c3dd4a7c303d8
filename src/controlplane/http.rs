// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! [`NamespaceControlPlaneClient`] over the control plane's HTTP API gateway.

use crate::constants::api::{CODE_ALREADY_EXISTS, CODE_NOT_FOUND, NAMESPACES_PATH};
use crate::controlplane::model::{
    DescribeNamespaceResponse, RegisterNamespaceRequest, UpdateNamespaceRequest,
};
use crate::controlplane::NamespaceControlPlaneClient;
use crate::error::{ControlPlaneError, ReconcilerError, Result};
use crate::transport::TlsSettings;
use async_trait::async_trait;
use http::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpControlPlaneClient {
    http: reqwest::Client,
    base_url: Url,
}

/// `google.rpc.Status` error body
#[derive(Deserialize, Default)]
struct RpcStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

impl HttpControlPlaneClient {
    /// Build a client for `address` (`host:port`). With TLS the request URL carries
    /// the TLS server name and that name is pinned to the resolved address.
    #[instrument(skip(tls, timeout))]
    pub async fn connect(address: &str, tls: Option<&TlsSettings>, timeout: Duration) -> Result<Self> {
        let builder = reqwest::Client::builder().timeout(timeout);

        let (builder, base_url) = match tls {
            None => (builder, format!("http://{}", address)),
            Some(tls) => {
                let target = tokio::net::lookup_host(address)
                    .await
                    .map_err(|e| {
                        ReconcilerError::Configuration(format!("Failed to resolve address {}: {}", address, e))
                    })?
                    .next()
                    .ok_or_else(|| {
                        ReconcilerError::Configuration(format!("Address {} did not resolve", address))
                    })?;
                debug!("Pinning {} to {}", tls.server_name, target);

                let builder = builder
                    .use_preconfigured_tls(tls.client_config()?)
                    .resolve(&tls.server_name, target);
                (builder, format!("https://{}:{}", url_host(&tls.server_name), target.port()))
            }
        };

        let base_url = Url::parse(&base_url).map_err(|e| {
            ReconcilerError::Configuration(format!("Invalid control plane address {}: {}", address, e))
        })?;
        let http = builder.build().map_err(|e| {
            ReconcilerError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        info!("Control plane client ready for {}", base_url);
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `/api/v1/namespaces[/{name}[/{action}]]` under the base URL
    fn namespaces_url(&self, segments: &[&str]) -> std::result::Result<Url, ControlPlaneError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ControlPlaneError::Transport(format!("{} cannot be a base URL", self.base_url)))?
            .clear()
            .extend(NAMESPACES_PATH)
            .extend(segments);
        Ok(url)
    }

    async fn check(response: reqwest::Response, namespace: &str) -> std::result::Result<reqwest::Response, ControlPlaneError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.map_err(|e| {
            ControlPlaneError::Transport(format!("Failed to read {} response body: {}", status, e))
        })?;
        Err(error_from_response(status, &body, namespace))
    }
}

#[async_trait]
impl NamespaceControlPlaneClient for HttpControlPlaneClient {
    #[instrument(skip(self, request), fields(namespace = %request.namespace))]
    async fn register(&self, request: RegisterNamespaceRequest) -> std::result::Result<(), ControlPlaneError> {
        let url = self.namespaces_url(&[])?;
        let response = self.http.post(url).json(&request).send().await.map_err(transport)?;
        Self::check(response, &request.namespace).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn describe(&self, name: &str) -> std::result::Result<DescribeNamespaceResponse, ControlPlaneError> {
        let url = self.namespaces_url(&[name])?;
        let response = self.http.get(url).send().await.map_err(transport)?;
        Self::check(response, name)
            .await?
            .json::<DescribeNamespaceResponse>()
            .await
            .map_err(transport)
    }

    #[instrument(skip(self, request), fields(namespace = %request.namespace))]
    async fn update(&self, request: UpdateNamespaceRequest) -> std::result::Result<(), ControlPlaneError> {
        let url = self.namespaces_url(&[request.namespace.as_str(), "update"])?;
        let response = self.http.post(url).json(&request).send().await.map_err(transport)?;
        Self::check(response, &request.namespace).await?;
        Ok(())
    }
}

fn transport(error: reqwest::Error) -> ControlPlaneError {
    ControlPlaneError::Transport(error.to_string())
}

/// Map a failed gateway response to a typed error, preferring the RPC code in the body
fn error_from_response(status: StatusCode, body: &str, namespace: &str) -> ControlPlaneError {
    let rpc: RpcStatus = serde_json::from_str(body).unwrap_or_default();

    let code = if rpc.code != 0 {
        rpc.code
    } else if status == StatusCode::CONFLICT {
        CODE_ALREADY_EXISTS
    } else if status == StatusCode::NOT_FOUND {
        CODE_NOT_FOUND
    } else {
        i32::from(status.as_u16())
    };

    match code {
        CODE_ALREADY_EXISTS => ControlPlaneError::AlreadyExists(namespace.to_string()),
        CODE_NOT_FOUND => ControlPlaneError::NotFound(namespace.to_string()),
        code => ControlPlaneError::Rpc {
            code,
            message: if rpc.message.is_empty() {
                format!("HTTP {}: {}", status, body.trim())
            } else {
                rpc.message
            },
        },
    }
}

fn url_host(host: &str) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]", host)
    } else {
        host.to_string()
    }
}

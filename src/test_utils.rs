// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! In-memory stand-ins for the control plane, its HTTP gateway and the document fetcher.

use crate::controlplane::model::{
    ClusterReplicationConfig, DescribeNamespaceResponse, NamespaceConfig, NamespaceInfo, NamespaceReplicationConfig,
    RegisterNamespaceRequest, UpdateNamespaceRequest,
};
use crate::controlplane::NamespaceControlPlaneClient;
use crate::error::{ControlPlaneError, ReconcilerError, Result};
use crate::transport::DocumentFetcher;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

/// Cluster the mock control plane reports for namespaces registered without replication
pub const CURRENT_CLUSTER: &str = "active";

/// A call received by [`MockControlPlane`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Register(RegisterNamespaceRequest),
    Describe(String),
    Update(UpdateNamespaceRequest),
}

#[derive(Default)]
struct ControlPlaneState {
    namespaces: HashMap<String, DescribeNamespaceResponse>,
    calls: Vec<Call>,
    failures: HashMap<&'static str, (i32, String)>,
}

/// Control plane that keeps namespaces in memory and records every call.
/// Clones share state.
#[derive(Clone, Default)]
pub struct MockControlPlane {
    state: Arc<Mutex<ControlPlaneState>>,
}

impl MockControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call of `operation` ("register", "describe", "update") fail
    pub fn fail(self, operation: &'static str, code: i32, message: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(operation, (code, message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn namespace(&self, name: &str) -> Option<DescribeNamespaceResponse> {
        self.state.lock().unwrap().namespaces.get(name).cloned()
    }

    fn record(&self, operation: &'static str, call: Call) -> std::result::Result<(), ControlPlaneError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.failures.get(operation) {
            Some((code, message)) => Err(ControlPlaneError::Rpc {
                code: *code,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NamespaceControlPlaneClient for MockControlPlane {
    async fn register(&self, request: RegisterNamespaceRequest) -> std::result::Result<(), ControlPlaneError> {
        self.record("register", Call::Register(request.clone()))?;

        let mut state = self.state.lock().unwrap();
        if state.namespaces.contains_key(&request.namespace) {
            return Err(ControlPlaneError::AlreadyExists(request.namespace));
        }

        let id = format!("ns-{}", state.namespaces.len() + 1);
        // Like a single-cluster server, fall back to the current cluster
        let (active_cluster_name, clusters) = if request.active_cluster_name.is_empty() {
            (
                CURRENT_CLUSTER.to_string(),
                vec![ClusterReplicationConfig {
                    cluster_name: CURRENT_CLUSTER.to_string(),
                }],
            )
        } else {
            (request.active_cluster_name, request.clusters)
        };
        let record = DescribeNamespaceResponse {
            namespace_info: NamespaceInfo {
                name: request.namespace.clone(),
                state: "NAMESPACE_STATE_REGISTERED".to_string(),
                description: request.description,
                owner_email: request.owner_email,
                data: request.data,
                id,
            },
            config: NamespaceConfig {
                workflow_execution_retention_ttl: request.workflow_execution_retention_period,
                history_archival_state: request.history_archival_state,
                history_archival_uri: request.history_archival_uri,
                visibility_archival_state: request.visibility_archival_state,
                visibility_archival_uri: request.visibility_archival_uri,
            },
            replication_config: NamespaceReplicationConfig {
                active_cluster_name,
                clusters,
                state: "REPLICATION_STATE_NORMAL".to_string(),
            },
            is_global_namespace: request.is_global_namespace,
        };
        state.namespaces.insert(request.namespace, record);
        Ok(())
    }

    async fn describe(&self, name: &str) -> std::result::Result<DescribeNamespaceResponse, ControlPlaneError> {
        self.record("describe", Call::Describe(name.to_string()))?;

        self.namespace(name)
            .ok_or_else(|| ControlPlaneError::NotFound(name.to_string()))
    }

    async fn update(&self, request: UpdateNamespaceRequest) -> std::result::Result<(), ControlPlaneError> {
        self.record("update", Call::Update(request.clone()))?;

        let mut state = self.state.lock().unwrap();
        let record = state
            .namespaces
            .get_mut(&request.namespace)
            .ok_or_else(|| ControlPlaneError::NotFound(request.namespace.clone()))?;

        record.namespace_info.description = request.update_info.description;
        record.namespace_info.owner_email = request.update_info.owner_email;
        // Metadata keys are merged, never removed
        record.namespace_info.data.extend(request.update_info.data);
        record.config = request.config;
        if !request.replication_config.active_cluster_name.is_empty() {
            record.replication_config.active_cluster_name = request.replication_config.active_cluster_name;
        }
        if !request.replication_config.clusters.is_empty() {
            record.replication_config.clusters = request.replication_config.clusters;
        }
        Ok(())
    }
}

/// A request received by [`MockGateway`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// HTTP gateway on a local port answering with predefined responses per method and path.
/// Unmatched requests get a `NOT_FOUND` RPC status.
#[derive(Clone, Default)]
pub struct MockGateway {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.respond("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.respond("POST", path, status, body)
    }

    fn respond(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Start serving on an ephemeral port and return the base URL
    pub async fn start(self) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let gateway = self.clone();
                tokio::spawn(async move {
                    let _ = gateway.serve(stream).await;
                });
            }
        });

        Url::parse(&format!("http://{}", address)).unwrap()
    }

    async fn serve(&self, mut stream: TcpStream) -> std::io::Result<()> {
        let (read, mut write) = stream.split();
        let mut reader = BufReader::new(read);

        let mut request_line = String::new();
        reader.read_line(&mut request_line).await?;
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let path = parts.next().unwrap_or_default().to_string();

        let mut content_length = 0;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).await? == 0 || line.trim_end().is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.trim().eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }
        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).await?;

        let response = self
            .responses
            .lock()
            .unwrap()
            .get(&(method.clone(), path.clone()))
            .cloned();
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path,
            body: String::from_utf8_lossy(&body).into_owned(),
        });

        let (status, body) = response
            .unwrap_or_else(|| (404, r#"{"code":5,"message":"Namespace not found."}"#.to_string()));
        let reason = http::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("");
        let reply = format!(
            "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        );
        write.write_all(reply.as_bytes()).await?;
        write.shutdown().await
    }
}

/// Fetcher serving documents from memory and recording every lookup
#[derive(Clone, Default)]
pub struct MockFetcher {
    documents: HashMap<String, Vec<u8>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_local(mut self, path: &str, contents: Vec<u8>) -> Self {
        self.documents.insert(path.to_string(), contents);
        self
    }

    pub fn with_https(mut self, url: &str, contents: Vec<u8>) -> Self {
        self.documents.insert(url.to_string(), contents);
        self
    }

    /// Every path or URL requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn lookup(&self, key: &str) -> Result<Bytes> {
        self.requests.lock().unwrap().push(key.to_string());
        self.documents
            .get(key)
            .map(|contents| Bytes::from(contents.clone()))
            .ok_or_else(|| ReconcilerError::Configuration(format!("Failed to read {}: not found", key)))
    }
}

#[async_trait]
impl DocumentFetcher for MockFetcher {
    async fn fetch_local(&self, path: &str) -> Result<Bytes> {
        self.lookup(path)
    }

    async fn fetch_https(&self, url: &Url) -> Result<Bytes> {
        self.lookup(url.as_str())
    }
}

/// Contents of a file under `tests/fixtures`
pub fn fixture(name: &str) -> Vec<u8> {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", name].iter().collect();
    std::fs::read(&path).unwrap_or_else(|e| panic!("missing fixture {}: {}", path.display(), e))
}

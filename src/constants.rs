// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Frontend address used when `TEMPORAL_ADDRESS` is not set
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:7233";

/// Retention applied when a namespace declares none, in days
pub const DEFAULT_RETENTION: &str = "30";

/// Environment variables read by [`Config`](crate::config::Config)
pub mod env {
    pub const ADDRESS: &str = "TEMPORAL_ADDRESS";
    pub const TLS_CA_PATH: &str = "TEMPORAL_TLS_CA_PATH";
    pub const TLS_CERT_PATH: &str = "TEMPORAL_TLS_CERT_PATH";
    pub const TLS_KEY_PATH: &str = "TEMPORAL_TLS_KEY_PATH";
    pub const TLS_SERVER_NAME: &str = "TEMPORAL_TLS_SERVER_NAME";
    pub const TLS_DISABLE_HOST_VERIFICATION: &str = "TEMPORAL_TLS_DISABLE_HOST_VERIFICATION";
    pub const REQUEST_TIMEOUT_SECS: &str = "TEMPORAL_REQUEST_TIMEOUT_SECS";
    pub const NAMESPACES_FILE: &str = "NAMESPACES_FILE";
}

/// HTTP API gateway of the control plane
pub mod api {
    /// Path segments of the namespaces collection, `/api/v1/namespaces`
    pub const NAMESPACES_PATH: [&str; 3] = ["api", "v1", "namespaces"];
    /// Default per-request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// `google.rpc.Code` values the client maps to typed errors
    pub const CODE_NOT_FOUND: i32 = 5;
    pub const CODE_ALREADY_EXISTS: i32 = 6;
}

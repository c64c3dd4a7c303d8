// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{api, env as vars, DEFAULT_ADDRESS};
use crate::transport::TransportOptions;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Process configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Host and port of the control plane frontend
    pub address: String,
    pub tls_ca_path: Option<String>,
    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,
    pub tls_server_name: Option<String>,
    pub tls_disable_host_verification: bool,
    pub request_timeout: Duration,
    /// YAML manifest listing the namespaces to reconcile
    pub namespaces_file: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let namespaces_file = get(vars::NAMESPACES_FILE)
            .map(PathBuf::from)
            .context("NAMESPACES_FILE environment variable not set")?;

        let tls_disable_host_verification = get(vars::TLS_DISABLE_HOST_VERIFICATION)
            .map(|v| v.trim().parse::<bool>())
            .transpose()
            .with_context(|| format!("{} must be true or false", vars::TLS_DISABLE_HOST_VERIFICATION))?
            .unwrap_or(false);

        let request_timeout_secs = get(vars::REQUEST_TIMEOUT_SECS)
            .map(|v| v.trim().parse::<u64>())
            .transpose()
            .with_context(|| format!("{} must be a number of seconds", vars::REQUEST_TIMEOUT_SECS))?
            .unwrap_or(api::REQUEST_TIMEOUT_SECS);

        Ok(Config {
            address: get(vars::ADDRESS).unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            tls_ca_path: get(vars::TLS_CA_PATH),
            tls_cert_path: get(vars::TLS_CERT_PATH),
            tls_key_path: get(vars::TLS_KEY_PATH),
            tls_server_name: get(vars::TLS_SERVER_NAME),
            tls_disable_host_verification,
            request_timeout: Duration::from_secs(request_timeout_secs),
            namespaces_file,
        })
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            ca_path_or_url: self.tls_ca_path.clone(),
            cert_path: self.tls_cert_path.clone(),
            key_path: self.tls_key_path.clone(),
            disable_host_verification: self.tls_disable_host_verification,
            server_name: self.tls_server_name.clone(),
            target_host_port: self.address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("NAMESPACES_FILE", "namespaces.yaml")]).unwrap();

        assert_eq!(config.address, "127.0.0.1:7233");
        assert_eq!(config.namespaces_file, PathBuf::from("namespaces.yaml"));
        assert!(!config.tls_disable_host_verification);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.tls_ca_path.is_none());
    }

    #[test]
    fn test_namespaces_file_is_required() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("NAMESPACES_FILE"));
    }

    #[test]
    fn test_tls_options_flow_into_transport_options() {
        let config = load(&[
            ("NAMESPACES_FILE", "namespaces.yaml"),
            ("TEMPORAL_ADDRESS", "temporal.internal:7233"),
            ("TEMPORAL_TLS_CA_PATH", "https://certs.example.com/ca.pem"),
            ("TEMPORAL_TLS_CERT_PATH", "/certs/client.pem"),
            ("TEMPORAL_TLS_KEY_PATH", "/certs/client-key.pem"),
            ("TEMPORAL_TLS_SERVER_NAME", "temporal.example.com"),
            ("TEMPORAL_TLS_DISABLE_HOST_VERIFICATION", "true"),
        ])
        .unwrap();

        let options = config.transport_options();
        assert_eq!(options.target_host_port, "temporal.internal:7233");
        assert_eq!(options.ca_path_or_url.as_deref(), Some("https://certs.example.com/ca.pem"));
        assert_eq!(options.cert_path.as_deref(), Some("/certs/client.pem"));
        assert_eq!(options.key_path.as_deref(), Some("/certs/client-key.pem"));
        assert_eq!(options.server_name.as_deref(), Some("temporal.example.com"));
        assert!(options.disable_host_verification);
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let config = load(&[
            ("NAMESPACES_FILE", "namespaces.yaml"),
            ("TEMPORAL_ADDRESS", ""),
            ("TEMPORAL_TLS_SERVER_NAME", " "),
        ])
        .unwrap();

        assert_eq!(config.address, "127.0.0.1:7233");
        assert!(config.tls_server_name.is_none());
    }

    #[test]
    fn test_invalid_host_verification_flag() {
        let err = load(&[
            ("NAMESPACES_FILE", "namespaces.yaml"),
            ("TEMPORAL_TLS_DISABLE_HOST_VERIFICATION", "maybe"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("TEMPORAL_TLS_DISABLE_HOST_VERIFICATION"));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = load(&[
            ("NAMESPACES_FILE", "namespaces.yaml"),
            ("TEMPORAL_REQUEST_TIMEOUT_SECS", "soon"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("TEMPORAL_REQUEST_TIMEOUT_SECS"));
    }
}

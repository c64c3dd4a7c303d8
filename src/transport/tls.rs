// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Derivation of the client TLS settings used to reach the control plane.

use crate::error::{ReconcilerError, Result};
use crate::transport::fetch::DocumentFetcher;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{ring, CryptoProvider};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName, UnixTime};
use rustls::sign::CertifiedKey;
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Named transport options, as configured for the process
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    /// Local path or `https://` URL of a PEM CA bundle
    pub ca_path_or_url: Option<String>,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
    pub disable_host_verification: bool,
    /// Overrides the host used for certificate verification
    pub server_name: Option<String>,
    pub target_host_port: String,
}

/// Client certificate chain and its private key
pub struct ClientIdentity {
    pub cert_chain: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
}

impl Clone for ClientIdentity {
    fn clone(&self) -> Self {
        Self {
            cert_chain: self.cert_chain.clone(),
            key: self.key.clone_key(),
        }
    }
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("cert_chain", &self.cert_chain.len())
            .field("key", &"<redacted>")
            .finish()
    }
}

/// TLS settings for the control plane connection
#[derive(Debug, Clone)]
pub struct TlsSettings {
    /// Hostname the server certificate is verified against
    pub server_name: String,
    /// Custom trust roots; `None` means the operating system trust store
    pub root_certificates: Option<RootCertStore>,
    pub client_identity: Option<ClientIdentity>,
    pub skip_host_verification: bool,
}

impl TlsSettings {
    /// Roots used to verify the server: the custom bundle, or the system store
    pub fn trust_roots(&self) -> RootCertStore {
        match &self.root_certificates {
            Some(roots) => roots.clone(),
            None => system_roots(),
        }
    }

    /// Build a rustls client configuration from these settings
    pub fn client_config(&self) -> Result<ClientConfig> {
        let provider = Arc::new(ring::default_provider());
        let builder = ClientConfig::builder_with_provider(provider.clone())
            .with_safe_default_protocol_versions()
            .map_err(|e| {
                ReconcilerError::Configuration(format!("Failed to configure TLS protocol versions: {}", e))
            })?;

        let builder = if self.skip_host_verification {
            warn!(
                "TLS host verification is disabled for {}, the server certificate will not be checked",
                self.server_name
            );
            builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(SkipServerVerification(provider)))
        } else {
            builder.with_root_certificates(self.trust_roots())
        };

        match &self.client_identity {
            Some(identity) => builder
                .with_client_auth_cert(identity.cert_chain.clone(), identity.key.clone_key())
                .map_err(|e| {
                    ReconcilerError::Configuration(format!("Failed to configure client certificate: {}", e))
                }),
            None => Ok(builder.with_no_client_auth()),
        }
    }
}

/// Trust anchors of the operating system certificate store
fn system_roots() -> RootCertStore {
    let loaded = rustls_native_certs::load_native_certs();
    for e in &loaded.errors {
        warn!("Failed to load system trust roots: {}", e);
    }
    roots_or_bundled(loaded.certs)
}

/// Store holding `certs`, or the bundled web PKI roots when none of them is usable
fn roots_or_bundled(certs: Vec<CertificateDer<'static>>) -> RootCertStore {
    let mut store = RootCertStore::empty();
    let (added, ignored) = store.add_parsable_certificates(certs);
    debug!("Loaded {} system trust roots, ignored {}", added, ignored);

    if store.is_empty() {
        warn!("No usable system trust roots found, falling back to the bundled web PKI roots");
        store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }
    store
}

/// Derive TLS settings from `options`. Returns `None` when nothing asks for TLS.
#[instrument(skip(options, fetcher), fields(target = %options.target_host_port))]
pub async fn build_tls_settings(
    options: &TransportOptions,
    fetcher: &dyn DocumentFetcher,
) -> Result<Option<TlsSettings>> {
    let root_certificates = match configured(&options.ca_path_or_url) {
        Some(location) => Some(load_trust_roots(location, fetcher).await?),
        None => None,
    };

    let client_identity = match configured(&options.cert_path) {
        Some(cert_path) => {
            let key_path = configured(&options.key_path).ok_or_else(|| {
                ReconcilerError::Configuration(format!(
                    "tls_key_path must be set when tls_cert_path is set ({})",
                    cert_path
                ))
            })?;
            Some(load_client_identity(cert_path, key_path, fetcher).await?)
        }
        None => {
            if let Some(key_path) = configured(&options.key_path) {
                warn!("tls_key_path {} is ignored because tls_cert_path is not set", key_path);
            }
            None
        }
    };

    let server_name = configured(&options.server_name);

    if root_certificates.is_some() || client_identity.is_some() {
        let server_name = server_name
            .map(str::to_string)
            .unwrap_or_else(|| host_of(&options.target_host_port));
        info!(
            "TLS enabled for {} (custom roots: {}, client certificate: {})",
            server_name,
            root_certificates.is_some(),
            client_identity.is_some()
        );
        return Ok(Some(TlsSettings {
            server_name,
            root_certificates,
            client_identity,
            skip_host_verification: options.disable_host_verification,
        }));
    }

    if let Some(server_name) = server_name {
        info!("TLS enabled for {} with system trust roots", server_name);
        return Ok(Some(TlsSettings {
            server_name: server_name.to_string(),
            root_certificates: None,
            client_identity: None,
            skip_host_verification: options.disable_host_verification,
        }));
    }

    debug!("No TLS material configured, using plaintext transport");
    Ok(None)
}

async fn load_trust_roots(location: &str, fetcher: &dyn DocumentFetcher) -> Result<RootCertStore> {
    if location.starts_with("http://") {
        return Err(ReconcilerError::Configuration(format!(
            "Insecure fetch of trust material refused for tls_ca_path {}, provide an https:// URL",
            location
        )));
    }

    let pem = if location.starts_with("https://") {
        let url = Url::parse(location).map_err(|e| {
            ReconcilerError::Configuration(format!("Invalid tls_ca_path URL {}: {}", location, e))
        })?;
        fetcher.fetch_https(&url).await?
    } else {
        fetcher.fetch_local(location).await?
    };

    let mut store = RootCertStore::empty();
    for cert in parse_certificates(&pem, location)? {
        store.add(cert).map_err(|e| {
            ReconcilerError::Configuration(format!("Invalid CA certificate in {}: {}", location, e))
        })?;
    }
    debug!("Loaded {} trust roots from {}", store.len(), location);
    Ok(store)
}

async fn load_client_identity(
    cert_path: &str,
    key_path: &str,
    fetcher: &dyn DocumentFetcher,
) -> Result<ClientIdentity> {
    let cert_pem = fetcher.fetch_local(cert_path).await?;
    let cert_chain = parse_certificates(&cert_pem, cert_path)?;

    let key_pem = fetcher.fetch_local(key_path).await?;
    let key = rustls_pemfile::private_key(&mut &key_pem[..])
        .map_err(|e| {
            ReconcilerError::Configuration(format!("Failed to parse private key {}: {}", key_path, e))
        })?
        .ok_or_else(|| {
            ReconcilerError::Configuration(format!("No private key found in {}", key_path))
        })?;

    let signing_key = ring::sign::any_supported_type(&key).map_err(|e| {
        ReconcilerError::Configuration(format!("Unsupported private key in {}: {}", key_path, e))
    })?;
    CertifiedKey::new(cert_chain.clone(), signing_key)
        .keys_match()
        .map_err(|e| {
            ReconcilerError::Configuration(format!(
                "Private key {} does not match certificate {}: {}",
                key_path, cert_path, e
            ))
        })?;

    Ok(ClientIdentity { cert_chain, key })
}

fn parse_certificates(pem: &[u8], source: &str) -> Result<Vec<CertificateDer<'static>>> {
    let certs = rustls_pemfile::certs(&mut &pem[..])
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| {
            ReconcilerError::Configuration(format!("Failed to parse certificates in {}: {}", source, e))
        })?;

    if certs.is_empty() {
        return Err(ReconcilerError::Configuration(format!(
            "No PEM certificates found in {}",
            source
        )));
    }
    Ok(certs)
}

fn configured(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Host portion of `host:port`, without brackets for IPv6 literals
pub(crate) fn host_of(host_port: &str) -> String {
    if let Some((host, _)) = host_port.strip_prefix('[').and_then(|rest| rest.split_once(']')) {
        return host.to_string();
    }
    match host_port.rsplit_once(':') {
        Some((host, _)) if !host.contains(':') => host.to_string(),
        _ => host_port.to_string(),
    }
}

/// Accepts any server certificate, used when host verification is disabled
#[derive(Debug)]
struct SkipServerVerification(Arc<CryptoProvider>);

impl ServerCertVerifier for SkipServerVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}

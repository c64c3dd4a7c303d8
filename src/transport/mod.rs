// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Transport configuration for the control plane connection: optional TLS with
//! custom trust roots, client certificates and server name override.

pub mod fetch;
pub mod tls;

pub use fetch::{DefaultFetcher, DocumentFetcher};
pub use tls::{build_tls_settings, ClientIdentity, TlsSettings, TransportOptions};

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Context, Result};
use futures::future::join_all;
use tracing::{error, info};

use namespace_reconciler::config::Config;
use namespace_reconciler::controlplane::HttpControlPlaneClient;
use namespace_reconciler::reconcilers::NamespaceReconciler;
use namespace_reconciler::transport::{build_tls_settings, DefaultFetcher};
use namespace_reconciler::types::NamespaceManifest;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting namespace reconciler");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: address={}, namespaces_file={}",
        config.address,
        config.namespaces_file.display()
    );

    let manifest = NamespaceManifest::from_path(&config.namespaces_file)
        .context("Failed to load namespace manifest")?;
    info!("Found {} declared namespaces", manifest.namespaces.len());

    // Derive the transport once for the whole run
    let fetcher = DefaultFetcher::new()?;
    let tls = build_tls_settings(&config.transport_options(), &fetcher)
        .await
        .context("Failed to build TLS configuration")?;

    let client = HttpControlPlaneClient::connect(&config.address, tls.as_ref(), config.request_timeout)
        .await
        .context("Failed to create control plane client")?;
    let reconciler = NamespaceReconciler::new(client);

    // Namespaces are independent, so they are reconciled concurrently
    let results = join_all(manifest.namespaces.iter().map(|ns| reconciler.reconcile(ns))).await;

    let mut failures = 0;
    for (ns, result) in manifest.namespaces.iter().zip(results) {
        match result {
            Ok(outcome) => info!(
                "Namespace {} reconciled (retention {} days, state {})",
                outcome.identity,
                outcome.state.retention(),
                outcome.state.state
            ),
            Err(e) => {
                failures += 1;
                error!("Failed to reconcile namespace {}: {}", ns.name, e);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} namespaces failed to reconcile", failures, manifest.namespaces.len());
    }

    info!("All namespaces reconciled");
    Ok(())
}

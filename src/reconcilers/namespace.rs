// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace reconciler - drives one declared namespace towards its desired state.

use crate::controlplane::NamespaceControlPlaneClient;
use crate::error::{ControlPlaneError, ReconcilerError, Result};
use crate::reconcilers::mapping::{register_request, remote_state, resolve_retention, update_request};
use crate::types::namespace::{NamespaceRemoteState, NamespaceSpec, ReconciliationResult};
use tracing::{debug, info, instrument, warn};

/// Create, read, update and delete hooks for namespace resources.
///
/// Operations on different namespaces may run concurrently. Operations on the same
/// namespace must be serialized by the caller.
pub struct NamespaceReconciler<C> {
    client: C,
}

impl<C: NamespaceControlPlaneClient> NamespaceReconciler<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Register the namespace. An already existing namespace counts as created.
    /// Returns the resource identity.
    #[instrument(skip(self, desired), fields(namespace = %desired.name))]
    pub async fn create(&self, desired: &NamespaceSpec) -> Result<String> {
        if desired.name.trim().is_empty() {
            return Err(ReconcilerError::Configuration(
                "Field 'name' must not be empty".to_string(),
            ));
        }

        let retention = resolve_retention(desired)?;
        let request = register_request(desired, retention);

        match self.client.register(request).await {
            Ok(()) => info!("Namespace {} registered", desired.name),
            Err(ControlPlaneError::AlreadyExists(_)) => {
                info!("Namespace {} already exists, adopting it", desired.name)
            }
            Err(e) => return Err(ReconcilerError::remote("register namespace", e)),
        }

        Ok(desired.name.clone())
    }

    /// Fetch the authoritative record for `identity`
    #[instrument(skip(self))]
    pub async fn read(&self, identity: &str) -> Result<NamespaceRemoteState> {
        match self.client.describe(identity).await {
            Ok(response) => {
                let state = remote_state(response);
                debug!("Namespace {} has retention {} days", identity, state.retention());
                Ok(state)
            }
            Err(ControlPlaneError::NotFound(_)) => Err(ReconcilerError::NotFound(identity.to_string())),
            Err(e) => Err(ReconcilerError::remote("describe namespace", e)),
        }
    }

    /// Apply `desired` to an existing namespace. `last_applied` is the last known
    /// declared state; when no mutable field differs no call is made.
    #[instrument(skip(self, last_applied, desired))]
    pub async fn update(
        &self,
        identity: &str,
        last_applied: &NamespaceSpec,
        desired: &NamespaceSpec,
    ) -> Result<String> {
        if identity != desired.name {
            return Err(ReconcilerError::Configuration(format!(
                "Namespace identity is immutable: cannot rename {} to {}",
                identity, desired.name
            )));
        }

        if last_applied.is_global_namespace != desired.is_global_namespace {
            warn!(
                "Namespace {}: is_global_namespace cannot be changed after creation, keeping {}",
                identity, last_applied.is_global_namespace
            );
        }

        let changed = last_applied.changed_fields(desired);
        if changed.is_empty() {
            debug!("Namespace {} is up to date", identity);
            return Ok(identity.to_string());
        }
        info!("Updating namespace {}: changed {}", identity, changed.join(", "));

        let retention = resolve_retention(desired)?;
        self.client
            .update(update_request(desired, retention))
            .await
            .map_err(|e| ReconcilerError::remote("update namespace", e))?;

        Ok(identity.to_string())
    }

    /// The control plane cannot delete namespaces, so this only lets the caller
    /// forget the resource
    #[instrument(skip(self))]
    pub fn delete(&self, identity: &str) -> Result<()> {
        info!(
            "Namespace {} left in place: the control plane does not support deleting namespaces",
            identity
        );
        Ok(())
    }

    /// Bring the namespace to `desired`, creating it when absent, and read it back
    #[instrument(skip(self, desired), fields(namespace = %desired.name))]
    pub async fn reconcile(&self, desired: &NamespaceSpec) -> Result<ReconciliationResult> {
        let identity = match self.read(&desired.name).await {
            Ok(current) => self.update(&desired.name, &current.to_spec(), desired).await?,
            Err(e) if e.is_not_found() => self.create(desired).await?,
            Err(e) => return Err(e),
        };

        let state = self.read(&identity).await?;
        Ok(ReconciliationResult { identity, state })
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Capability the reconciler needs from the control plane, plus an HTTP implementation.

pub mod http;
pub mod model;

use crate::error::ControlPlaneError;
use async_trait::async_trait;
use model::{DescribeNamespaceResponse, RegisterNamespaceRequest, UpdateNamespaceRequest};

pub use self::http::HttpControlPlaneClient;

/// Namespace operations exposed by the control plane. There is no delete.
#[async_trait]
pub trait NamespaceControlPlaneClient: Send + Sync {
    /// Register a new namespace. Fails with [`ControlPlaneError::AlreadyExists`] if the name is taken.
    async fn register(&self, request: RegisterNamespaceRequest) -> Result<(), ControlPlaneError>;

    /// Fetch the authoritative record. Fails with [`ControlPlaneError::NotFound`] if absent.
    async fn describe(&self, name: &str) -> Result<DescribeNamespaceResponse, ControlPlaneError>;

    async fn update(&self, request: UpdateNamespaceRequest) -> Result<(), ControlPlaneError>;
}

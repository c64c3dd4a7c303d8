// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

/// Failures reported by a [`NamespaceControlPlaneClient`](crate::controlplane::NamespaceControlPlaneClient).
#[derive(Error, Debug)]
pub enum ControlPlaneError {
    #[error("namespace {0} already exists")]
    AlreadyExists(String),

    #[error("namespace {0} not found")]
    NotFound(String),

    #[error("control plane returned code {code}: {message}")]
    Rpc { code: i32, message: String },

    #[error("transport failure: {0}")]
    Transport(String),
}

#[derive(Error, Debug)]
pub enum ReconcilerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{operation} failed: {source}")]
    RemoteCall {
        operation: &'static str,
        #[source]
        source: ControlPlaneError,
    },

    #[error("Namespace {0} not found")]
    NotFound(String),
}

impl ReconcilerError {
    pub fn remote(operation: &'static str, source: ControlPlaneError) -> Self {
        ReconcilerError::RemoteCall { operation, source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ReconcilerError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, ReconcilerError>;

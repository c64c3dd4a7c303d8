// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Declarative namespace records and their helpers.

pub mod manifest;
pub mod namespace;
pub mod retention;

pub use manifest::NamespaceManifest;
pub use namespace::{NamespaceRemoteState, NamespaceSpec, ReconciliationResult};

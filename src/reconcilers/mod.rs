// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reconcilers that turn declared namespaces into control plane calls.

pub mod mapping;
pub mod namespace;

pub use namespace::NamespaceReconciler;

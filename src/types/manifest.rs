// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Operator-authored YAML listing the namespaces to reconcile.

use crate::error::{ReconcilerError, Result};
use crate::types::namespace::NamespaceSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NamespaceManifest {
    #[serde(default)]
    pub namespaces: Vec<NamespaceSpec>,
}

impl NamespaceManifest {
    /// JSON Schema of the manifest, including the namespace resource schema
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(NamespaceManifest)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ReconcilerError::Configuration(format!(
                "Failed to read manifest {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let manifest: NamespaceManifest = serde_yaml::from_str(contents)
            .map_err(|e| ReconcilerError::Configuration(format!("Failed to parse manifest: {}", e)))?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for ns in &self.namespaces {
            if ns.name.trim().is_empty() {
                return Err(ReconcilerError::Configuration(
                    "Field 'name' must not be empty".to_string(),
                ));
            }
            if !seen.insert(ns.name.as_str()) {
                return Err(ReconcilerError::Configuration(format!(
                    "Namespace {} is declared more than once",
                    ns.name
                )));
            }
        }
        Ok(())
    }
}

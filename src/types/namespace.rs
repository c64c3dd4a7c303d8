// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::DEFAULT_RETENTION;
use crate::types::retention::{format_days, parse_retention};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared state of one namespace
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NamespaceSpec {
    /// The name of the namespace. Used as the resource identity and cannot change.
    pub name: String,
    /// The description of the namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Email address of the namespace owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    /// Retention period for closed workflow executions. A bare number is a count of days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention: Option<String>,
    #[serde(default)]
    pub history_archival_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_archival_uri: Option<String>,
    #[serde(default)]
    pub visibility_archival_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_archival_uri: Option<String>,
    /// Only honoured at creation time
    #[serde(default)]
    pub is_global_namespace: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_cluster: Option<String>,
    /// Replication targets, used only when `active_cluster` is set
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clusters: Vec<String>,
    /// Opaque key/value annotations stored with the namespace
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl NamespaceSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Retention as declared, or the default policy
    pub fn retention_or_default(&self) -> &str {
        self.retention
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(DEFAULT_RETENTION)
    }

    /// The active cluster, if one is set to a non-empty name
    pub fn active_cluster(&self) -> Option<&str> {
        self.active_cluster.as_deref().filter(|c| !c.is_empty())
    }

    /// Names of the mutable fields whose value differs between `self` (last applied)
    /// and `desired`. `is_global_namespace` is never reported.
    ///
    /// Replication is only compared when `desired` sets an active cluster, and
    /// metadata only over the keys `desired` declares. The control plane fills in
    /// its own cluster for unreplicated namespaces and merges metadata, so anything
    /// outside those bounds cannot be changed by an update.
    pub fn changed_fields(&self, desired: &NamespaceSpec) -> Vec<&'static str> {
        let mut changed = Vec::new();

        if text(&self.description) != text(&desired.description) {
            changed.push("description");
        }
        if text(&self.owner_email) != text(&desired.owner_email) {
            changed.push("owner_email");
        }
        if !same_retention(self.retention_or_default(), desired.retention_or_default()) {
            changed.push("retention");
        }
        if self.history_archival_enabled != desired.history_archival_enabled {
            changed.push("history_archival_enabled");
        }
        if text(&self.history_archival_uri) != text(&desired.history_archival_uri) {
            changed.push("history_archival_uri");
        }
        if self.visibility_archival_enabled != desired.visibility_archival_enabled {
            changed.push("visibility_archival_enabled");
        }
        if text(&self.visibility_archival_uri) != text(&desired.visibility_archival_uri) {
            changed.push("visibility_archival_uri");
        }
        if desired.active_cluster().is_some() {
            if self.active_cluster() != desired.active_cluster() {
                changed.push("active_cluster");
            }
            if self.clusters != desired.clusters {
                changed.push("clusters");
            }
        }
        if desired
            .metadata
            .iter()
            .any(|(key, value)| self.metadata.get(key) != Some(value))
        {
            changed.push("metadata");
        }

        changed
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn same_retention(a: &str, b: &str) -> bool {
    match (parse_retention(a), parse_retention(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Authoritative namespace record as reported by the control plane
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct NamespaceRemoteState {
    pub name: String,
    pub id: String,
    pub state: String,
    pub description: String,
    pub owner_email: String,
    /// Retention in days, possibly fractional
    pub retention_days: f64,
    pub history_archival_enabled: bool,
    pub history_archival_uri: String,
    pub visibility_archival_enabled: bool,
    pub visibility_archival_uri: String,
    pub is_global_namespace: bool,
    pub active_cluster: String,
    pub clusters: Vec<String>,
    pub metadata: BTreeMap<String, String>,
}

impl NamespaceRemoteState {
    /// Retention rendered as a day count (`"17"`, `"1.5"`)
    pub fn retention(&self) -> String {
        format_days(self.retention_days)
    }

    /// Project the remote record onto the declarative field set
    pub fn to_spec(&self) -> NamespaceSpec {
        NamespaceSpec {
            name: self.name.clone(),
            description: non_empty(&self.description),
            owner_email: non_empty(&self.owner_email),
            retention: Some(self.retention()),
            history_archival_enabled: self.history_archival_enabled,
            history_archival_uri: non_empty(&self.history_archival_uri),
            visibility_archival_enabled: self.visibility_archival_enabled,
            visibility_archival_uri: non_empty(&self.visibility_archival_uri),
            is_global_namespace: self.is_global_namespace,
            active_cluster: non_empty(&self.active_cluster),
            clusters: self.clusters.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Outcome of reconciling one declared namespace
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReconciliationResult {
    /// Stable identity of the resource, the namespace name
    pub identity: String,
    pub state: NamespaceRemoteState,
}

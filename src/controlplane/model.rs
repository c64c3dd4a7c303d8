// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Request and response shapes of the namespace API, in the JSON form the HTTP
//! gateway uses (camelCase names, `ARCHIVAL_STATE_*` enums, `"<seconds>s"` durations).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArchivalState {
    #[default]
    #[serde(rename = "ARCHIVAL_STATE_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "ARCHIVAL_STATE_DISABLED")]
    Disabled,
    #[serde(rename = "ARCHIVAL_STATE_ENABLED")]
    Enabled,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterReplicationConfig {
    pub cluster_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterNamespaceRequest {
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owner_email: String,
    #[serde(default, with = "proto_duration", skip_serializing_if = "Option::is_none")]
    pub workflow_execution_retention_period: Option<Duration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clusters: Vec<ClusterReplicationConfig>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub active_cluster_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
    #[serde(default)]
    pub is_global_namespace: bool,
    #[serde(default)]
    pub history_archival_state: ArchivalState,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub history_archival_uri: String,
    #[serde(default)]
    pub visibility_archival_state: ArchivalState,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub visibility_archival_uri: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNamespaceInfo {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner_email: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceConfig {
    #[serde(default, with = "proto_duration", skip_serializing_if = "Option::is_none")]
    pub workflow_execution_retention_ttl: Option<Duration>,
    #[serde(default)]
    pub history_archival_state: ArchivalState,
    #[serde(default)]
    pub history_archival_uri: String,
    #[serde(default)]
    pub visibility_archival_state: ArchivalState,
    #[serde(default)]
    pub visibility_archival_uri: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceReplicationConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub active_cluster_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clusters: Vec<ClusterReplicationConfig>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNamespaceRequest {
    pub namespace: String,
    pub update_info: UpdateNamespaceInfo,
    pub config: NamespaceConfig,
    pub replication_config: NamespaceReplicationConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner_email: String,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    #[serde(default)]
    pub id: String,
}

/// Authoritative record returned by a describe call
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DescribeNamespaceResponse {
    #[serde(default)]
    pub namespace_info: NamespaceInfo,
    #[serde(default)]
    pub config: NamespaceConfig,
    #[serde(default)]
    pub replication_config: NamespaceReplicationConfig,
    #[serde(default)]
    pub is_global_namespace: bool,
}

/// `google.protobuf.Duration` in its JSON form, e.g. `"1468800s"` or `"1.5s"`
pub(crate) mod proto_duration {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) if d.subsec_nanos() == 0 => serializer.serialize_str(&format!("{}s", d.as_secs())),
            Some(d) => serializer.serialize_str(&format!("{}.{:09}s", d.as_secs(), d.subsec_nanos())),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let seconds = raw
            .strip_suffix('s')
            .ok_or_else(|| D::Error::custom(format!("duration '{}' has no 's' suffix", raw)))?;
        let seconds: f64 = seconds
            .parse()
            .map_err(|e| D::Error::custom(format!("invalid duration '{}': {}", raw, e)))?;
        Duration::try_from_secs_f64(seconds)
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid duration '{}': {}", raw, e)))
    }
}

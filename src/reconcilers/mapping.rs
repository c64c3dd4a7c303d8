// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Translation between declared namespace records and control plane requests/responses.

use crate::controlplane::model::{
    ArchivalState, ClusterReplicationConfig, DescribeNamespaceResponse, NamespaceConfig,
    NamespaceReplicationConfig, RegisterNamespaceRequest, UpdateNamespaceInfo,
    UpdateNamespaceRequest,
};
use crate::error::Result;
use crate::types::namespace::{NamespaceRemoteState, NamespaceSpec};
use crate::types::retention::{parse_retention, retention_days};
use std::time::Duration;

pub fn archival_state(enabled: bool) -> ArchivalState {
    if enabled {
        ArchivalState::Enabled
    } else {
        ArchivalState::Disabled
    }
}

pub fn archival_enabled(state: ArchivalState) -> bool {
    state == ArchivalState::Enabled
}

/// Declared retention, or the default policy, as a duration
pub fn resolve_retention(spec: &NamespaceSpec) -> Result<Duration> {
    parse_retention(spec.retention_or_default())
}

/// Replication targets, empty unless an active cluster is declared
pub fn replication_clusters(spec: &NamespaceSpec) -> Vec<ClusterReplicationConfig> {
    if spec.active_cluster().is_none() {
        return Vec::new();
    }
    spec.clusters
        .iter()
        .map(|name| ClusterReplicationConfig {
            cluster_name: name.clone(),
        })
        .collect()
}

pub fn register_request(spec: &NamespaceSpec, retention: Duration) -> RegisterNamespaceRequest {
    RegisterNamespaceRequest {
        namespace: spec.name.clone(),
        description: spec.description.clone().unwrap_or_default(),
        owner_email: spec.owner_email.clone().unwrap_or_default(),
        workflow_execution_retention_period: Some(retention),
        clusters: replication_clusters(spec),
        active_cluster_name: spec.active_cluster().unwrap_or_default().to_string(),
        data: spec.metadata.clone(),
        is_global_namespace: spec.is_global_namespace,
        history_archival_state: archival_state(spec.history_archival_enabled),
        history_archival_uri: spec.history_archival_uri.clone().unwrap_or_default(),
        visibility_archival_state: archival_state(spec.visibility_archival_enabled),
        visibility_archival_uri: spec.visibility_archival_uri.clone().unwrap_or_default(),
    }
}

pub fn update_request(spec: &NamespaceSpec, retention: Duration) -> UpdateNamespaceRequest {
    UpdateNamespaceRequest {
        namespace: spec.name.clone(),
        update_info: UpdateNamespaceInfo {
            description: spec.description.clone().unwrap_or_default(),
            owner_email: spec.owner_email.clone().unwrap_or_default(),
            data: spec.metadata.clone(),
        },
        config: NamespaceConfig {
            workflow_execution_retention_ttl: Some(retention),
            history_archival_state: archival_state(spec.history_archival_enabled),
            history_archival_uri: spec.history_archival_uri.clone().unwrap_or_default(),
            visibility_archival_state: archival_state(spec.visibility_archival_enabled),
            visibility_archival_uri: spec.visibility_archival_uri.clone().unwrap_or_default(),
        },
        replication_config: NamespaceReplicationConfig {
            active_cluster_name: spec.active_cluster().unwrap_or_default().to_string(),
            clusters: replication_clusters(spec),
            state: String::new(),
        },
    }
}

/// Project a describe response onto the declarative field set
pub fn remote_state(response: DescribeNamespaceResponse) -> NamespaceRemoteState {
    let DescribeNamespaceResponse {
        namespace_info: info,
        config,
        replication_config: replication,
        is_global_namespace,
    } = response;

    NamespaceRemoteState {
        name: info.name,
        id: info.id,
        state: info.state,
        description: info.description,
        owner_email: info.owner_email,
        retention_days: retention_days(config.workflow_execution_retention_ttl.unwrap_or_default()),
        history_archival_enabled: archival_enabled(config.history_archival_state),
        history_archival_uri: config.history_archival_uri,
        visibility_archival_enabled: archival_enabled(config.visibility_archival_state),
        visibility_archival_uri: config.visibility_archival_uri,
        is_global_namespace,
        active_cluster: replication.active_cluster_name,
        clusters: replication
            .clusters
            .into_iter()
            .map(|c| c.cluster_name)
            .collect(),
        metadata: info.data,
    }
}

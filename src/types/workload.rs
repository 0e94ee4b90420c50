// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{PodSwapError, Result};
use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet, StatefulSet};

/// The workload whose pods a dev pod replaces. The adapter in
/// `replace::target` is the only place that understands per-kind shape.
#[derive(Clone, Debug)]
pub enum TargetWorkload {
    ReplicaSet(ReplicaSet),
    Deployment(Deployment),
    StatefulSet(StatefulSet),
}

impl TargetWorkload {
    /// Deserialize a dynamic object into the matching variant. Any kind
    /// other than the three supported ones is rejected.
    pub fn from_unstructured(kind: &str, object: serde_json::Value) -> Result<Self> {
        let malformed =
            |e: serde_json::Error| PodSwapError::UnrecognizedTargetKind(format!("{kind}: {e}"));
        match kind {
            "ReplicaSet" => Ok(Self::ReplicaSet(
                serde_json::from_value(object).map_err(malformed)?,
            )),
            "Deployment" => Ok(Self::Deployment(
                serde_json::from_value(object).map_err(malformed)?,
            )),
            "StatefulSet" => Ok(Self::StatefulSet(
                serde_json::from_value(object).map_err(malformed)?,
            )),
            other => Err(PodSwapError::UnrecognizedTargetKind(other.to_string())),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::ReplicaSet(_) => "ReplicaSet",
            Self::Deployment(_) => "Deployment",
            Self::StatefulSet(_) => "StatefulSet",
        }
    }

    pub fn name(&self) -> String {
        let name = match self {
            Self::ReplicaSet(rs) => &rs.metadata.name,
            Self::Deployment(d) => &d.metadata.name,
            Self::StatefulSet(sts) => &sts.metadata.name,
        };
        name.clone().unwrap_or_default()
    }

    pub fn namespace(&self) -> Option<String> {
        let namespace = match self {
            Self::ReplicaSet(rs) => &rs.metadata.namespace,
            Self::Deployment(d) => &d.metadata.namespace,
            Self::StatefulSet(sts) => &sts.metadata.namespace,
        };
        namespace.clone()
    }
}

impl From<ReplicaSet> for TargetWorkload {
    fn from(rs: ReplicaSet) -> Self {
        Self::ReplicaSet(rs)
    }
}

impl From<Deployment> for TargetWorkload {
    fn from(d: Deployment) -> Self {
        Self::Deployment(d)
    }
}

impl From<StatefulSet> for TargetWorkload {
    fn from(sts: StatefulSet) -> Self {
        Self::StatefulSet(sts)
    }
}

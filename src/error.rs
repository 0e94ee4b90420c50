// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PodSwapError {
    #[error("unrecognized target workload kind: {0}")]
    UnrecognizedTargetKind(String),

    #[error("couldn't find container '{container}' in the pod template targeted by dev pod '{dev_pod}'")]
    ContainerNotFound { dev_pod: String, container: String },

    #[error("couldn't modify pod as multiple containers were found ({names}), but no container was specified in dev pod '{dev_pod}'")]
    ContainerResolutionAmbiguous { dev_pod: String, names: String },

    #[error("dev pod '{dev_pod}' requests a container restart on sync, please specify the entrypoint that should get restarted in its command field")]
    RestartHelperMisconfigured { dev_pod: String },

    #[error("failed to load restart helper script from '{path}': {reason}")]
    RestartHelperLoadFailure { path: String, reason: String },

    #[error("failed to apply pod patches: {0}")]
    PatchApplicationFailure(String),

    #[error("failed to resolve runtime variables in '{input}': {reason}")]
    RuntimeVariableResolution { input: String, reason: String },

    #[error("invalid resource quantity '{value}' for {field}: {reason}")]
    ResourceParseFailure {
        field: String,
        value: String,
        reason: String,
    },

    #[error("failed to serialize dev pod configuration for hashing: {0}")]
    HashComputationFailure(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PodSwapError>;

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declarative dev pod configuration.
///
/// This is the sole input of the configuration fingerprint: two values with
/// identical serialized content hash identically, no matter which workload
/// they are applied to.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DevPodSpec {
    /// Logical name of the dev pod, used in diagnostics
    pub name: String,
    /// Pattern identifying the target container by image when no container
    /// name is configured. May contain runtime placeholders.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image_selector: String,
    /// Structural patches applied to the pod template before any per-container
    /// mutation, in list order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub patches: Vec<PatchRule>,
    /// Container paths that must survive pod replacement
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub persist_paths: Vec<PersistPath>,
    /// Per-container override sets, applied in declared order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<DevContainerSpec>,
}

/// Override set for a single container of the replaced pod.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DevContainerSpec {
    /// Explicit name of the container to modify. When absent, the container
    /// is resolved via the pod shape and the dev pod's image selector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Replacement image, possibly containing runtime placeholders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_image: Option<String>,
    /// Replacement entrypoint. Required when a restart helper is injected.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    /// Replacement arguments. `None` leaves the original args untouched,
    /// `Some(vec![])` clears them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    /// Environment entries appended to the container's environment
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attach: Option<AttachOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<TerminalOverride>,
    /// Never inject the restart helper, even when sync rules ask for restarts
    pub disable_restart_helper: bool,
    /// Custom source path for the restart helper script
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart_helper_path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sync: Vec<SyncRule>,
}

impl DevContainerSpec {
    /// Whether the restart helper must be injected: the helper is not
    /// disabled and at least one sync rule wants to (re)start the container.
    pub fn needs_restart_helper(&self) -> bool {
        !self.disable_restart_helper
            && self.sync.iter().any(|s| {
                s.start_container || s.on_upload.as_ref().is_some_and(|u| u.restart_container)
            })
    }

    /// Whether the terminal override replaces the container entrypoint
    pub fn terminal_active(&self) -> bool {
        self.terminal
            .as_ref()
            .is_some_and(|t| !t.disable_replace && t.enabled != Some(false))
    }

    /// Whether the attach override modifies the container
    pub fn attach_active(&self) -> bool {
        self.attach
            .as_ref()
            .is_some_and(|a| !a.disable_replace && a.enabled != Some(false))
    }
}

/// A single name/value environment entry
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvEntry {
    pub name: String,
    pub value: String,
}

/// Terminal mode toggle. The tri-state `enabled` distinguishes "unset"
/// (active by default once the override is present) from an explicit off.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TerminalOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    pub disable_replace: bool,
}

/// Attach mode toggle
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AttachOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    pub disable_replace: bool,
    pub disable_tty: bool,
}

/// A file sync rule. Only the restart-relevant fields matter to the build
/// pipeline; path wiring is handled by the sync client.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub start_container: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_upload: Option<OnUpload>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OnUpload {
    pub restart_container: bool,
}

/// Resource limit/request overrides as Kubernetes quantity strings
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceOverride {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub limits: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub requests: BTreeMap<String, String>,
}

/// One RFC 6902 operation applied to the pod template
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PatchRule {
    /// Operation: add, remove, replace, move, copy or test
    pub op: String,
    /// JSON pointer into the pod template
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

/// A container path that must survive pod replacement
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistPath {
    /// Absolute path inside the container
    pub path: String,
    /// Container to mount into; resolved like any other container reference
    /// when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Sub-path inside the persistence volume; derived from `path` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_path: Option<String>,
    pub read_only: bool,
}

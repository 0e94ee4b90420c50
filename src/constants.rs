// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Kubernetes annotation keys written by podswap. These form a stable
/// contract: surrounding tooling locates replaced pods through them.
pub mod annotations {
    /// Name of the original workload the dev pod replaces
    pub const TARGET_NAME: &str = "podswap.dev/target-name";
    /// Kind of the original workload (ReplicaSet, Deployment or StatefulSet)
    pub const TARGET_KIND: &str = "podswap.dev/target-kind";
    /// Fingerprint of the dev pod configuration used for this build
    pub const CONFIG_HASH: &str = "podswap.dev/config-hash";
    /// Always "true" on objects produced by the transformer
    pub const REPLACED: &str = "podswap.dev/replaced";
    /// Resolved image matched by the configured image selector
    pub const IMAGE_SELECTOR: &str = "podswap.dev/image-selector";
    /// `;`-joined container names matched during initial resolution
    pub const MATCHED_CONTAINER: &str = "podswap.dev/matched-container";
    /// Prefix for the per-container annotation holding the restart helper script
    pub const RESTART_HELPER_PREFIX: &str = "podswap.dev/restart-helper-";
}

/// Label keys written by podswap
pub mod labels {
    /// Marks the replacement Deployment and its pod template
    pub const REPLACED: &str = "podswap.dev/replaced";
}

/// Restart helper injection constants
pub mod restart {
    /// File name of the helper script inside its volume
    pub const SCRIPT_NAME: &str = "restart-helper.sh";
    /// Absolute path the helper script is mounted at inside the container
    pub const SCRIPT_PATH: &str = "/.podswap/restart-helper.sh";
    /// Prefix for the per-container downward API volume name
    pub const VOLUME_PREFIX: &str = "podswap-restart-";
    /// File mode for the mounted script
    pub const DEFAULT_MODE: i32 = 0o777;
}

/// Persistent path rewiring constants
pub mod persist {
    /// Name of the shared PVC-backed volume added for persistent paths
    pub const VOLUME_NAME: &str = "podswap-persistence";
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Content fingerprint of the dev pod configuration.

use crate::error::{PodSwapError, Result};
use crate::runtime::RuntimeResolver;
use crate::types::DevPodSpec;
use sha2::{Digest, Sha256};

/// Hash the dev pod configuration.
///
/// The hash is a pure function of the serialized configuration: it does not
/// depend on the workload the configuration is applied to, and runtime
/// placeholders are hashed unexpanded. Two builds with different resolved
/// images but identical raw configuration therefore hash identically.
pub fn hash_config(dev_pod: &DevPodSpec) -> Result<String> {
    let serialized = serde_yaml::to_string(dev_pod)?;
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Resolve the configured image selector to the concrete image it matched,
/// for the bookkeeping annotation. `None` when no selector is configured; a
/// selector that resolves to nothing is an error.
pub(crate) async fn resolved_image_selector(
    dev_pod: &DevPodSpec,
    resolver: &dyn RuntimeResolver,
) -> Result<Option<String>> {
    if dev_pod.image_selector.is_empty() {
        return Ok(None);
    }

    let resolved = resolver
        .resolve_image_selector(&dev_pod.image_selector)
        .await?;
    match resolved {
        Some(image) => Ok(Some(image)),
        None => Err(PodSwapError::RuntimeVariableResolution {
            input: dev_pod.image_selector.clone(),
            reason: "couldn't resolve image selector".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::IdentityResolver;
    use crate::types::devpod::{DevContainerSpec, EnvEntry};

    fn dev_pod() -> DevPodSpec {
        DevPodSpec {
            name: "web".to_string(),
            image_selector: "registry/app".to_string(),
            containers: vec![DevContainerSpec {
                dev_image: Some("dev:latest".to_string()),
                env: vec![EnvEntry {
                    name: "DEBUG".to_string(),
                    value: "1".to_string(),
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_config(&dev_pod()).unwrap(), hash_config(&dev_pod()).unwrap());
    }

    #[test]
    fn test_any_field_change_changes_hash() {
        let base = hash_config(&dev_pod()).unwrap();

        let mut renamed = dev_pod();
        renamed.name = "api".to_string();
        assert_ne!(hash_config(&renamed).unwrap(), base);

        let mut image_changed = dev_pod();
        image_changed.containers[0].dev_image = Some("dev:next".to_string());
        assert_ne!(hash_config(&image_changed).unwrap(), base);

        let mut env_changed = dev_pod();
        env_changed.containers[0].env[0].value = "0".to_string();
        assert_ne!(hash_config(&env_changed).unwrap(), base);
    }

    #[tokio::test]
    async fn test_resolved_image_selector() {
        let value = resolved_image_selector(&dev_pod(), &IdentityResolver)
            .await
            .unwrap();
        assert_eq!(value, Some("registry/app".to_string()));

        let none = resolved_image_selector(&DevPodSpec::default(), &IdentityResolver)
            .await
            .unwrap();
        assert_eq!(none, None);
    }
}

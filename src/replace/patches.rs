// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Applies user-declared structural patches to the working pod template.

use crate::error::{PodSwapError, Result};
use crate::types::DevPodSpec;
use k8s_openapi::api::core::v1::PodTemplateSpec;
use std::collections::BTreeMap;
use tracing::debug;

/// Apply the dev pod's patch sequence to the template.
///
/// An empty patch list returns a plain deep copy. Otherwise the template is
/// round-tripped through a generic JSON value, patched in list order, and
/// deserialized back; label and annotation maps removed by a patch are
/// re-initialized so later stages never see absent metadata.
pub fn apply_pod_patches(
    template: &PodTemplateSpec,
    dev_pod: &DevPodSpec,
) -> Result<PodTemplateSpec> {
    if dev_pod.patches.is_empty() {
        return Ok(template.clone());
    }

    debug!(
        dev_pod = %dev_pod.name,
        count = dev_pod.patches.len(),
        "applying pod patches"
    );

    let mut value = serde_json::to_value(template)
        .map_err(|e| PodSwapError::PatchApplicationFailure(e.to_string()))?;

    let ops = serde_json::to_value(&dev_pod.patches)
        .map_err(|e| PodSwapError::PatchApplicationFailure(e.to_string()))?;
    let patch: json_patch::Patch = serde_json::from_value(ops)
        .map_err(|e| PodSwapError::PatchApplicationFailure(e.to_string()))?;

    json_patch::patch(&mut value, &patch)
        .map_err(|e| PodSwapError::PatchApplicationFailure(e.to_string()))?;

    let mut patched: PodTemplateSpec = serde_json::from_value(value)
        .map_err(|e| PodSwapError::PatchApplicationFailure(e.to_string()))?;

    let meta = patched.metadata.get_or_insert_with(Default::default);
    if meta.labels.is_none() {
        meta.labels = Some(BTreeMap::new());
    }
    if meta.annotations.is_none() {
        meta.annotations = Some(BTreeMap::new());
    }

    Ok(patched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::devpod::PatchRule;
    use k8s_openapi::api::core::v1::{Container, PodSpec};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use serde_json::json;

    fn template() -> PodTemplateSpec {
        PodTemplateSpec {
            metadata: Some(ObjectMeta {
                labels: Some([("app".to_string(), "web".to_string())].into()),
                annotations: Some(BTreeMap::new()),
                ..Default::default()
            }),
            spec: Some(PodSpec {
                containers: vec![Container {
                    name: "web".to_string(),
                    image: Some("nginx".to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            }),
        }
    }

    fn dev_pod(patches: Vec<PatchRule>) -> DevPodSpec {
        DevPodSpec {
            name: "test".to_string(),
            patches,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_patch_list_returns_deep_copy() {
        let source = template();
        let result = apply_pod_patches(&source, &dev_pod(vec![])).unwrap();
        assert_eq!(result, source);
    }

    #[test]
    fn test_replace_patch_applies() {
        let result = apply_pod_patches(
            &template(),
            &dev_pod(vec![PatchRule {
                op: "replace".to_string(),
                path: "/spec/containers/0/image".to_string(),
                value: Some(json!("nginx:dev")),
            }]),
        )
        .unwrap();

        assert_eq!(
            result.spec.unwrap().containers[0].image.as_deref(),
            Some("nginx:dev")
        );
    }

    #[test]
    fn test_patches_apply_in_order() {
        let result = apply_pod_patches(
            &template(),
            &dev_pod(vec![
                PatchRule {
                    op: "replace".to_string(),
                    path: "/spec/containers/0/image".to_string(),
                    value: Some(json!("first")),
                },
                PatchRule {
                    op: "replace".to_string(),
                    path: "/spec/containers/0/image".to_string(),
                    value: Some(json!("second")),
                },
            ]),
        )
        .unwrap();

        assert_eq!(
            result.spec.unwrap().containers[0].image.as_deref(),
            Some("second")
        );
    }

    #[test]
    fn test_removed_metadata_maps_reinitialized() {
        let result = apply_pod_patches(
            &template(),
            &dev_pod(vec![PatchRule {
                op: "remove".to_string(),
                path: "/metadata/labels".to_string(),
                value: None,
            }]),
        )
        .unwrap();

        let meta = result.metadata.unwrap();
        assert_eq!(meta.labels, Some(BTreeMap::new()));
        assert!(meta.annotations.is_some());
    }

    #[test]
    fn test_invalid_patch_fails() {
        let err = apply_pod_patches(
            &template(),
            &dev_pod(vec![PatchRule {
                op: "replace".to_string(),
                path: "/spec/containers/9/image".to_string(),
                value: Some(json!("nope")),
            }]),
        )
        .unwrap_err();

        assert!(matches!(err, PodSwapError::PatchApplicationFailure(_)));
    }
}

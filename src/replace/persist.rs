// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Rewires volume mounts so configured paths survive pod replacement.

use crate::constants::persist;
use crate::error::{PodSwapError, Result};
use crate::replace::target::{containers, containers_mut, volumes_mut};
use crate::types::devpod::PersistPath;
use crate::types::DevPodSpec;
use k8s_openapi::api::core::v1::{
    PersistentVolumeClaimVolumeSource, PodTemplateSpec, Volume, VolumeMount,
};

/// Mount each configured persistent path from a shared PVC-backed volume.
///
/// One volume is added per build, its claim named after the replacement
/// deployment (the claim itself is provisioned by the orchestration layer).
/// Only mounts whose mount path equals a persistent path are replaced; every
/// other mount and volume is preserved.
pub fn persist_paths(
    name: &str,
    dev_pod: &DevPodSpec,
    template: &mut PodTemplateSpec,
) -> Result<()> {
    if dev_pod.persist_paths.is_empty() {
        return Ok(());
    }

    volumes_mut(template).push(Volume {
        name: persist::VOLUME_NAME.to_string(),
        persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
            claim_name: name.to_string(),
            ..Default::default()
        }),
        ..Default::default()
    });

    for persist_path in &dev_pod.persist_paths {
        let index = resolve_persist_container(dev_pod, template, persist_path)?;
        let sub_path = persist_path
            .volume_path
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| persist_path.path.trim_start_matches('/').to_string());

        let container = &mut containers_mut(template)[index];
        let mounts = container.volume_mounts.get_or_insert_with(Vec::new);
        mounts.retain(|m| m.mount_path != persist_path.path);
        mounts.push(VolumeMount {
            name: persist::VOLUME_NAME.to_string(),
            mount_path: persist_path.path.clone(),
            sub_path: Some(sub_path),
            read_only: persist_path.read_only.then_some(true),
            ..Default::default()
        });
    }

    Ok(())
}

/// Persist paths resolve containers without the image selector: an explicit
/// name, or the only container present.
fn resolve_persist_container(
    dev_pod: &DevPodSpec,
    template: &PodTemplateSpec,
    persist_path: &PersistPath,
) -> Result<usize> {
    match persist_path.container.as_deref().filter(|c| !c.is_empty()) {
        Some(explicit) => containers(template)
            .iter()
            .position(|c| c.name == explicit)
            .ok_or_else(|| PodSwapError::ContainerNotFound {
                dev_pod: dev_pod.name.clone(),
                container: explicit.to_string(),
            }),
        None if containers(template).len() == 1 => Ok(0),
        None => {
            let names = containers(template)
                .iter()
                .map(|c| format!("'{}'", c.name))
                .collect::<Vec<_>>()
                .join(" ");
            Err(PodSwapError::ContainerResolutionAmbiguous {
                dev_pod: dev_pod.name.clone(),
                names,
            })
        }
    }
}

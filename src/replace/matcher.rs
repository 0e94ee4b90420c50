// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resolves which container a dev container configuration targets.

use crate::error::{PodSwapError, Result};
use crate::replace::target::containers;
use crate::runtime::RuntimeResolver;
use crate::types::DevPodSpec;
use k8s_openapi::api::core::v1::PodTemplateSpec;

/// Names of the containers whose image matches the dev pod's image selector.
/// Empty when no selector is configured.
pub async fn matched_by_image_selector(
    template: &PodTemplateSpec,
    dev_pod: &DevPodSpec,
    resolver: &dyn RuntimeResolver,
) -> Result<Vec<String>> {
    if dev_pod.image_selector.is_empty() {
        return Ok(Vec::new());
    }

    let resolved = resolver
        .resolve_image_selector(&dev_pod.image_selector)
        .await?
        .ok_or_else(|| PodSwapError::RuntimeVariableResolution {
            input: dev_pod.image_selector.clone(),
            reason: "image selector resolved to nothing".to_string(),
        })?;

    Ok(containers(template)
        .iter()
        .filter(|c| {
            c.image
                .as_deref()
                .is_some_and(|image| compare_image_names(&resolved, image))
        })
        .map(|c| c.name.clone())
        .collect())
}

/// Resolve the index of the container a mutation step targets.
///
/// An explicit name wins. Without one, a single-container pod needs no
/// disambiguation; with several containers the image selector must match
/// exactly one, otherwise the build aborts with a message listing every
/// container present.
pub async fn resolve_container(
    template: &PodTemplateSpec,
    dev_pod: &DevPodSpec,
    explicit: Option<&str>,
    resolver: &dyn RuntimeResolver,
) -> Result<usize> {
    let mut container_name = explicit.unwrap_or("").to_string();
    if container_name.is_empty() && containers(template).len() > 1 {
        let matched = matched_by_image_selector(template, dev_pod, resolver).await?;
        if matched.len() != 1 {
            let names = containers(template)
                .iter()
                .map(|c| format!("'{}'", c.name))
                .collect::<Vec<_>>()
                .join(" ");
            return Err(PodSwapError::ContainerResolutionAmbiguous {
                dev_pod: dev_pod.name.clone(),
                names,
            });
        }
        container_name = matched.into_iter().next().unwrap_or_default();
    }

    containers(template)
        .iter()
        .position(|c| container_name.is_empty() || c.name == container_name)
        .ok_or_else(|| PodSwapError::ContainerNotFound {
            dev_pod: dev_pod.name.clone(),
            container: container_name,
        })
}

/// Compare a resolved image selector against a container image. The tag only
/// constrains the match when the selector carries one.
pub(crate) fn compare_image_names(selector: &str, image: &str) -> bool {
    let (selector_repo, selector_tag) = split_image(selector);
    let (image_repo, image_tag) = split_image(image);
    selector_repo == image_repo && selector_tag.is_none_or(|t| image_tag == Some(t))
}

/// Split an image reference into repository and tag. A ':' only denotes a
/// tag when it appears after the last '/', so registry ports are untouched.
fn split_image(image: &str) -> (&str, Option<&str>) {
    match image.rfind(':') {
        Some(i) if !image[i + 1..].contains('/') => (&image[..i], Some(&image[i + 1..])),
        _ => (image, None),
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Assembles the replacement Deployment from a target workload and a dev
//! pod configuration.

use crate::constants::{annotations, labels};
use crate::error::Result;
use crate::replace::{fingerprint, matcher, mutate, patches, persist, target};
use crate::runtime::{RestartHelperSource, RuntimeResolver};
use crate::types::{DevPodSpec, TargetWorkload};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use std::collections::BTreeMap;
use tracing::debug;

/// Build a standalone Deployment whose pod template has been modified for
/// interactive development.
///
/// The build is a single-shot, side-effect-free transformation: it never
/// talks to a cluster, and on error no partial object is returned. The
/// resulting Deployment carries bookkeeping annotations linking it back to
/// the source workload, and the replaced marker on both the Deployment and
/// its pod template.
pub async fn build_deployment(
    name: &str,
    target: &TargetWorkload,
    dev_pod: &DevPodSpec,
    resolver: &dyn RuntimeResolver,
    helper: &dyn RestartHelperSource,
) -> Result<Deployment> {
    let config_hash = fingerprint::hash_config(dev_pod)?;
    let normalized = target::normalize(target);

    let mut deployment_annotations = BTreeMap::from([
        (annotations::TARGET_NAME.to_string(), normalized.name.clone()),
        (annotations::TARGET_KIND.to_string(), normalized.kind.to_string()),
        (annotations::CONFIG_HASH.to_string(), config_hash),
        (annotations::REPLACED.to_string(), "true".to_string()),
    ]);

    // record the initially matched containers before any mutation runs
    let matched = matcher::matched_by_image_selector(&normalized.template, dev_pod, resolver).await?;

    let mut template = patches::apply_pod_patches(&normalized.template, dev_pod)?;

    for dev_container in &dev_pod.containers {
        mutate::apply_dev_container(dev_pod, dev_container, &mut template, resolver, helper)
            .await?;
    }

    persist::persist_paths(name, dev_pod, &mut template)?;

    let template_labels = {
        let template_labels = target::labels_mut(&mut template);
        template_labels.insert(labels::REPLACED.to_string(), "true".to_string());
        template_labels.clone()
    };

    let template_annotations = target::annotations_mut(&mut template);
    if let Some(image) = fingerprint::resolved_image_selector(dev_pod, resolver).await? {
        template_annotations.insert(annotations::IMAGE_SELECTOR.to_string(), image);
    }
    if !matched.is_empty() {
        let joined = matched.join(";");
        template_annotations.insert(annotations::MATCHED_CONTAINER.to_string(), joined.clone());
        deployment_annotations.insert(annotations::MATCHED_CONTAINER.to_string(), joined);
    }

    if let Ok(dump) = serde_yaml::to_string(&template) {
        debug!(dev_pod = %dev_pod.name, "replaced pod template:\n{dump}");
    }

    Ok(Deployment {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: target.namespace(),
            annotations: Some(deployment_annotations),
            labels: Some(BTreeMap::from([(
                labels::REPLACED.to_string(),
                "true".to_string(),
            )])),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            selector: LabelSelector {
                match_labels: Some(template_labels),
                ..Default::default()
            },
            template,
            ..Default::default()
        }),
        ..Default::default()
    })
}

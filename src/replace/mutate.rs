// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The ordered per-container mutation pipeline.
//!
//! Each step resolves its own target container, is independently skippable,
//! and leaves everything it does not target untouched.

use crate::constants::{annotations, restart};
use crate::error::{PodSwapError, Result};
use crate::replace::matcher::resolve_container;
use crate::replace::target::{annotations_mut, containers, containers_mut, volumes_mut};
use crate::runtime::{RestartHelperSource, RuntimeResolver};
use crate::types::{DevContainerSpec, DevPodSpec};
use k8s_openapi::api::core::v1::{
    Container, DownwardAPIVolumeFile, DownwardAPIVolumeSource, EnvVar, ObjectFieldSelector,
    PodTemplateSpec, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use std::collections::BTreeMap;
use tracing::debug;

/// Run all mutation steps for one dev container entry, in pipeline order.
pub async fn apply_dev_container(
    dev_pod: &DevPodSpec,
    dev_container: &DevContainerSpec,
    template: &mut PodTemplateSpec,
    resolver: &dyn RuntimeResolver,
    helper: &dyn RestartHelperSource,
) -> Result<()> {
    replace_image(dev_pod, dev_container, template, resolver).await?;
    replace_terminal(dev_pod, dev_container, template, resolver).await?;
    replace_attach(dev_pod, dev_container, template, resolver).await?;
    replace_env(dev_pod, dev_container, template, resolver).await?;
    replace_command(dev_pod, dev_container, template, resolver, helper).await?;
    replace_working_dir(dev_pod, dev_container, template, resolver).await?;
    replace_resources(dev_pod, dev_container, template, resolver).await?;
    Ok(())
}

async fn replace_image(
    dev_pod: &DevPodSpec,
    dev_container: &DevContainerSpec,
    template: &mut PodTemplateSpec,
    resolver: &dyn RuntimeResolver,
) -> Result<()> {
    let Some(dev_image) = dev_container.dev_image.as_deref().filter(|i| !i.is_empty()) else {
        return Ok(());
    };

    let index = resolve_target(dev_pod, dev_container, template, resolver).await?;
    let image = resolver.resolve_string(dev_image).await?;
    containers_mut(template)[index].image = Some(image);
    Ok(())
}

async fn replace_terminal(
    dev_pod: &DevPodSpec,
    dev_container: &DevContainerSpec,
    template: &mut PodTemplateSpec,
    resolver: &dyn RuntimeResolver,
) -> Result<()> {
    if !dev_container.terminal_active() {
        return Ok(());
    }

    let index = resolve_target(dev_pod, dev_container, template, resolver).await?;
    let container = &mut containers_mut(template)[index];
    clear_probes(container);
    container.command = Some(vec!["sleep".to_string(), "1000000000".to_string()]);
    container.args = Some(Vec::new());
    Ok(())
}

async fn replace_attach(
    dev_pod: &DevPodSpec,
    dev_container: &DevContainerSpec,
    template: &mut PodTemplateSpec,
    resolver: &dyn RuntimeResolver,
) -> Result<()> {
    if !dev_container.attach_active() {
        return Ok(());
    }
    let disable_tty = dev_container
        .attach
        .as_ref()
        .is_some_and(|a| a.disable_tty);

    let index = resolve_target(dev_pod, dev_container, template, resolver).await?;
    let container = &mut containers_mut(template)[index];
    clear_probes(container);
    container.stdin = Some(true);
    container.tty = Some(!disable_tty);
    Ok(())
}

async fn replace_env(
    dev_pod: &DevPodSpec,
    dev_container: &DevContainerSpec,
    template: &mut PodTemplateSpec,
    resolver: &dyn RuntimeResolver,
) -> Result<()> {
    if dev_container.env.is_empty() {
        return Ok(());
    }

    let index = resolve_target(dev_pod, dev_container, template, resolver).await?;
    let container = &mut containers_mut(template)[index];
    let env = container.env.get_or_insert_with(Vec::new);
    // append semantics: existing entries with the same name are kept
    for entry in &dev_container.env {
        env.push(EnvVar {
            name: entry.name.clone(),
            value: Some(entry.value.clone()),
            ..Default::default()
        });
    }
    Ok(())
}

async fn replace_command(
    dev_pod: &DevPodSpec,
    dev_container: &DevContainerSpec,
    template: &mut PodTemplateSpec,
    resolver: &dyn RuntimeResolver,
    helper: &dyn RestartHelperSource,
) -> Result<()> {
    let inject = dev_container.needs_restart_helper();
    if inject && dev_container.command.is_empty() {
        return Err(PodSwapError::RestartHelperMisconfigured {
            dev_pod: dev_pod.name.clone(),
        });
    }
    if !inject && dev_container.command.is_empty() && dev_container.args.is_none() {
        return Ok(());
    }

    let index = resolve_target(dev_pod, dev_container, template, resolver).await?;

    if inject {
        let container_name = containers(template)[index].name.clone();
        debug!(dev_pod = %dev_pod.name, container = %container_name, "injecting restart helper");

        let annotation = format!("{}{}", annotations::RESTART_HELPER_PREFIX, container_name);
        let script = helper.load(dev_container.restart_helper_path.as_deref())?;
        annotations_mut(template).insert(annotation.clone(), script);

        let volume_name = format!("{}{}", restart::VOLUME_PREFIX, container_name);
        volumes_mut(template).push(Volume {
            name: volume_name.clone(),
            downward_api: Some(DownwardAPIVolumeSource {
                default_mode: Some(restart::DEFAULT_MODE),
                items: Some(vec![DownwardAPIVolumeFile {
                    path: restart::SCRIPT_NAME.to_string(),
                    mode: Some(restart::DEFAULT_MODE),
                    field_ref: Some(ObjectFieldSelector {
                        api_version: Some("v1".to_string()),
                        field_path: format!("metadata.annotations['{annotation}']"),
                    }),
                    ..Default::default()
                }]),
            }),
            ..Default::default()
        });

        let container = &mut containers_mut(template)[index];
        container
            .volume_mounts
            .get_or_insert_with(Vec::new)
            .push(VolumeMount {
                name: volume_name,
                read_only: Some(true),
                sub_path: Some(restart::SCRIPT_NAME.to_string()),
                mount_path: restart::SCRIPT_PATH.to_string(),
                ..Default::default()
            });

        let mut command = vec![restart::SCRIPT_PATH.to_string()];
        command.extend(dev_container.command.iter().cloned());
        container.command = Some(command);
        if let Some(args) = &dev_container.args {
            container.args = Some(args.clone());
        }
        return Ok(());
    }

    // plain override: the new entrypoint may not honor the original probe
    // semantics, so the probes go
    let container = &mut containers_mut(template)[index];
    if !dev_container.command.is_empty() {
        container.command = Some(dev_container.command.clone());
    }
    if let Some(args) = &dev_container.args {
        container.args = Some(args.clone());
    }
    clear_probes(container);
    Ok(())
}

async fn replace_working_dir(
    dev_pod: &DevPodSpec,
    dev_container: &DevContainerSpec,
    template: &mut PodTemplateSpec,
    resolver: &dyn RuntimeResolver,
) -> Result<()> {
    let Some(working_dir) = dev_container.working_dir.as_deref().filter(|w| !w.is_empty()) else {
        return Ok(());
    };

    let index = resolve_target(dev_pod, dev_container, template, resolver).await?;
    containers_mut(template)[index].working_dir = Some(working_dir.to_string());
    Ok(())
}

async fn replace_resources(
    dev_pod: &DevPodSpec,
    dev_container: &DevContainerSpec,
    template: &mut PodTemplateSpec,
    resolver: &dyn RuntimeResolver,
) -> Result<()> {
    let Some(resources) = &dev_container.resources else {
        return Ok(());
    };

    let index = resolve_target(dev_pod, dev_container, template, resolver).await?;
    let limits = convert_quantities(&resources.limits, "limits")?;
    let requests = convert_quantities(&resources.requests, "requests")?;

    let container = &mut containers_mut(template)[index];
    let reqs = container.resources.get_or_insert_with(Default::default);
    reqs.limits = Some(limits);
    reqs.requests = Some(requests);
    Ok(())
}

async fn resolve_target(
    dev_pod: &DevPodSpec,
    dev_container: &DevContainerSpec,
    template: &PodTemplateSpec,
    resolver: &dyn RuntimeResolver,
) -> Result<usize> {
    resolve_container(
        template,
        dev_pod,
        dev_container.container.as_deref(),
        resolver,
    )
    .await
}

fn clear_probes(container: &mut Container) {
    container.readiness_probe = None;
    container.liveness_probe = None;
    container.startup_probe = None;
}

fn convert_quantities(
    source: &BTreeMap<String, String>,
    field: &str,
) -> Result<BTreeMap<String, Quantity>> {
    source
        .iter()
        .map(|(key, value)| {
            validate_quantity(value).map_err(|reason| PodSwapError::ResourceParseFailure {
                field: format!("{field}.{key}"),
                value: value.clone(),
                reason,
            })?;
            Ok((key.clone(), Quantity(value.clone())))
        })
        .collect()
}

/// Check that a string is a Kubernetes quantity: a number with an optional
/// binary or decimal unit suffix.
fn validate_quantity(value: &str) -> std::result::Result<(), String> {
    const SUFFIXES: [&str; 13] = [
        "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "m", "k", "M", "G", "T", "P", "E",
    ];

    let number = SUFFIXES
        .iter()
        .find(|s| value.ends_with(*s))
        .map_or(value, |s| &value[..value.len() - s.len()]);

    if number.is_empty() || number.parse::<f64>().is_err() {
        return Err(
            "expected a number with an optional unit suffix (e.g. '100m', '1', '128Mi')"
                .to_string(),
        );
    }
    Ok(())
}

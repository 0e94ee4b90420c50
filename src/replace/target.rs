// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Normalizes the supported workload kinds into one working pod template.

use crate::types::TargetWorkload;
use k8s_openapi::api::core::v1::{
    Container, PersistentVolumeClaimVolumeSource, PodTemplateSpec, Volume,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// A workload reduced to the parts the pipeline works on
pub struct NormalizedTarget {
    /// Deep copy of the workload's pod template; label and annotation maps
    /// are always present after normalization
    pub template: PodTemplateSpec,
    pub kind: &'static str,
    pub name: String,
}

/// Produce the working pod template for a target workload.
///
/// ReplicaSets and Deployments are copied verbatim. StatefulSets additionally
/// get the first replica's identity: a DNS-safe hostname and one synthesized
/// PVC volume per volume claim template.
pub fn normalize(target: &TargetWorkload) -> NormalizedTarget {
    let name = target.name();
    let mut template = empty_template();

    match target {
        TargetWorkload::ReplicaSet(rs) => {
            if let Some(spec) = &rs.spec {
                if let Some(src) = &spec.template {
                    copy_template(&mut template, src);
                }
            }
        }
        TargetWorkload::Deployment(d) => {
            if let Some(spec) = &d.spec {
                copy_template(&mut template, &spec.template);
            }
        }
        TargetWorkload::StatefulSet(sts) => {
            if let Some(spec) = &sts.spec {
                copy_template(&mut template, &spec.template);
                let pod_spec = template.spec.get_or_insert_with(Default::default);
                pod_spec.hostname = Some(format!("{name}-0").replace('.', "-"));

                for claim in spec.volume_claim_templates.as_deref().unwrap_or_default() {
                    let base = claim
                        .metadata
                        .name
                        .clone()
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| "data".to_string());
                    let claim_name = format!("{base}-{name}-0");
                    // every claim template lands under the fixed volume name
                    // "data", so with multiple templates only the last one
                    // survives
                    let volume = Volume {
                        name: "data".to_string(),
                        persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                            claim_name,
                            ..Default::default()
                        }),
                        ..Default::default()
                    };
                    let volumes = pod_spec.volumes.get_or_insert_with(Vec::new);
                    match volumes.iter_mut().find(|v| v.name == "data") {
                        Some(existing) => *existing = volume,
                        None => volumes.push(volume),
                    }
                }
            }
        }
    }

    NormalizedTarget {
        template,
        kind: target.kind(),
        name,
    }
}

fn empty_template() -> PodTemplateSpec {
    PodTemplateSpec {
        metadata: Some(ObjectMeta {
            labels: Some(BTreeMap::new()),
            annotations: Some(BTreeMap::new()),
            ..Default::default()
        }),
        spec: None,
    }
}

fn copy_template(dst: &mut PodTemplateSpec, src: &PodTemplateSpec) {
    if let Some(meta) = &src.metadata {
        let dst_meta = dst.metadata.get_or_insert_with(Default::default);
        dst_meta.labels = Some(meta.labels.clone().unwrap_or_default());
        dst_meta.annotations = Some(meta.annotations.clone().unwrap_or_default());
    }
    dst.spec = src.spec.clone();
}

/// Containers of a working template, empty when the pod spec is absent
pub(crate) fn containers(template: &PodTemplateSpec) -> &[Container] {
    template
        .spec
        .as_ref()
        .map(|s| s.containers.as_slice())
        .unwrap_or(&[])
}

pub(crate) fn containers_mut(template: &mut PodTemplateSpec) -> &mut Vec<Container> {
    &mut template.spec.get_or_insert_with(Default::default).containers
}

pub(crate) fn volumes_mut(template: &mut PodTemplateSpec) -> &mut Vec<Volume> {
    template
        .spec
        .get_or_insert_with(Default::default)
        .volumes
        .get_or_insert_with(Vec::new)
}

pub(crate) fn annotations_mut(template: &mut PodTemplateSpec) -> &mut BTreeMap<String, String> {
    template
        .metadata
        .get_or_insert_with(Default::default)
        .annotations
        .get_or_insert_with(BTreeMap::new)
}

pub(crate) fn labels_mut(template: &mut PodTemplateSpec) -> &mut BTreeMap<String, String> {
    template
        .metadata
        .get_or_insert_with(Default::default)
        .labels
        .get_or_insert_with(BTreeMap::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::apps::v1::{StatefulSet, StatefulSetSpec};
    use k8s_openapi::api::core::v1::{PersistentVolumeClaim, PodSpec};

    fn claim_template(name: Option<&str>) -> PersistentVolumeClaim {
        PersistentVolumeClaim {
            metadata: ObjectMeta {
                name: name.map(str::to_string),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn stateful_set(name: &str, claims: Vec<PersistentVolumeClaim>) -> TargetWorkload {
        TargetWorkload::StatefulSet(StatefulSet {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            spec: Some(StatefulSetSpec {
                template: PodTemplateSpec {
                    metadata: None,
                    spec: Some(PodSpec {
                        containers: vec![Container {
                            name: "app".to_string(),
                            ..Default::default()
                        }],
                        ..Default::default()
                    }),
                },
                volume_claim_templates: (!claims.is_empty()).then_some(claims),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    #[test]
    fn test_stateful_set_hostname_is_dns_safe() {
        let normalized = normalize(&stateful_set("my.app", vec![]));
        let spec = normalized.template.spec.unwrap();
        assert_eq!(spec.hostname, Some("my-app-0".to_string()));
    }

    #[test]
    fn test_stateful_set_pvc_naming_defaults_to_data() {
        let normalized = normalize(&stateful_set("db", vec![claim_template(None)]));
        let volumes = normalized.template.spec.unwrap().volumes.unwrap();
        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes[0].name, "data");
        assert_eq!(
            volumes[0]
                .persistent_volume_claim
                .as_ref()
                .unwrap()
                .claim_name,
            "data-db-0"
        );
    }

    #[test]
    fn test_stateful_set_multiple_claims_last_wins() {
        let normalized = normalize(&stateful_set(
            "db",
            vec![claim_template(Some("wal")), claim_template(Some("logs"))],
        ));
        let volumes = normalized.template.spec.unwrap().volumes.unwrap();
        assert_eq!(volumes.len(), 1);
        assert_eq!(
            volumes[0]
                .persistent_volume_claim
                .as_ref()
                .unwrap()
                .claim_name,
            "logs-db-0"
        );
    }

    #[test]
    fn test_normalized_template_does_not_alias_source() {
        let target = stateful_set("db", vec![]);
        let normalized = normalize(&target);
        let mut copy = normalized.template.clone();
        containers_mut(&mut copy)[0].name = "changed".to_string();

        // source workload untouched
        if let TargetWorkload::StatefulSet(sts) = &target {
            let src = &sts.spec.as_ref().unwrap().template;
            assert_eq!(src.spec.as_ref().unwrap().containers[0].name, "app");
        }
    }

    #[test]
    fn test_normalization_initializes_metadata_maps() {
        let normalized = normalize(&stateful_set("db", vec![]));
        let meta = normalized.template.metadata.unwrap();
        assert!(meta.labels.is_some());
        assert!(meta.annotations.is_some());
    }
}

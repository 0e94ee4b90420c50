// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Input data model: dev pod configuration and target workloads.

pub mod devpod;
pub mod workload;

pub use devpod::{DevContainerSpec, DevPodSpec};
pub use workload::TargetWorkload;

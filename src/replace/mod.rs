// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The workload-to-dev-pod transformation pipeline.
//!
//! Every stage operates on one deep-copied working pod template and returns
//! it for the next stage; no stage holds state across build calls, so builds
//! for different workloads may run concurrently.

pub mod builder;
pub mod fingerprint;
pub mod matcher;
pub mod mutate;
pub mod patches;
pub mod persist;
pub mod target;

pub use builder::build_deployment;
pub use fingerprint::hash_config;

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Seams for the external collaborators of the build pipeline.

pub mod resolver;
pub mod restart;

pub use resolver::{IdentityResolver, RuntimeResolver};
pub use restart::{BundledRestartHelper, RestartHelperSource};

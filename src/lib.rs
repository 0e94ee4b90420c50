// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod constants;
pub mod error;
pub mod replace;
pub mod runtime;
pub mod types;

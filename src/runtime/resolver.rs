// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::Result;
use async_trait::async_trait;

/// Runtime-variable substitution engine.
///
/// Image names and image selectors may carry placeholders that are only
/// resolvable at build time (e.g. the tag of a freshly built image).
/// Resolution may perform I/O; implementations must be safe for concurrent
/// use when builds run in parallel.
#[async_trait]
pub trait RuntimeResolver: Send + Sync {
    /// Expand placeholders inside an image string
    async fn resolve_string(&self, input: &str) -> Result<String>;

    /// Expand placeholders inside an image selector and return the resolved
    /// image, or `None` when the selector cannot be resolved to an image
    async fn resolve_image_selector(&self, selector: &str) -> Result<Option<String>>;
}

/// Resolver for configurations without runtime placeholders: every string
/// resolves to itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityResolver;

#[async_trait]
impl RuntimeResolver for IdentityResolver {
    async fn resolve_string(&self, input: &str) -> Result<String> {
        Ok(input.to_string())
    }

    async fn resolve_image_selector(&self, selector: &str) -> Result<Option<String>> {
        if selector.is_empty() {
            Ok(None)
        } else {
            Ok(Some(selector.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_identity_resolver_passthrough() {
        let resolver = IdentityResolver;
        assert_eq!(
            resolver.resolve_string("dev:latest").await.unwrap(),
            "dev:latest"
        );
        assert_eq!(
            resolver.resolve_image_selector("registry/app").await.unwrap(),
            Some("registry/app".to_string())
        );
        assert_eq!(resolver.resolve_image_selector("").await.unwrap(), None);
    }
}

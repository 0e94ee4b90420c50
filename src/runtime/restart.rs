// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{PodSwapError, Result};

/// The script injected in front of a container's entrypoint when sync rules
/// request in-place restarts. It re-runs the wrapped command whenever the
/// restart marker file appears and exits with the command's code otherwise.
const BUNDLED_SCRIPT: &str = r#"#!/bin/sh
#
# podswap restart helper. Wraps the original container entrypoint so the
# process can be restarted in place (e.g. after a file sync) without the
# pod being recreated. Touch the marker file and kill the child process to
# trigger a restart.
set -u

marker="/tmp/.podswap-restart"

while true; do
  rm -f "$marker"
  "$@" &
  pid=$!
  trap 'kill "$pid" 2>/dev/null' TERM INT
  wait "$pid"
  code=$?
  if [ -f "$marker" ]; then
    continue
  fi
  exit "$code"
done
"#;

/// Source of the restart helper script body.
pub trait RestartHelperSource: Send + Sync {
    /// Load the script, either from a configured source path or from a
    /// built-in default when no path is given
    fn load(&self, path: Option<&str>) -> Result<String>;
}

/// Default source: serves the bundled script, or reads a custom script from
/// disk when the dev container configures one.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledRestartHelper;

impl RestartHelperSource for BundledRestartHelper {
    fn load(&self, path: Option<&str>) -> Result<String> {
        match path.filter(|p| !p.is_empty()) {
            None => Ok(BUNDLED_SCRIPT.to_string()),
            Some(p) => std::fs::read_to_string(p).map_err(|e| {
                PodSwapError::RestartHelperLoadFailure {
                    path: p.to_string(),
                    reason: e.to_string(),
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_script_is_shell() {
        let script = BundledRestartHelper.load(None).unwrap();
        assert!(script.starts_with("#!/bin/sh"));
        assert!(script.contains(".podswap-restart"));
    }

    #[test]
    fn test_missing_custom_script_fails() {
        let err = BundledRestartHelper
            .load(Some("/nonexistent/helper.sh"))
            .unwrap_err();
        assert!(matches!(
            err,
            PodSwapError::RestartHelperLoadFailure { path, .. } if path == "/nonexistent/helper.sh"
        ));
    }
}

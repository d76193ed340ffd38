//! Executable discovery for the taskqueue CLI.
//!
//! Probes a fixed, ordered candidate list and accepts the first path whose
//! `--version` invocation exits 0. "Not installed" is a normal outcome
//! (`None`), never an error.

use std::path::Path;

use crate::adapter::DEFAULT_TIMEOUT_MS;
use crate::shell::Shell;

/// Binary name of the wrapped CLI.
pub const CLI_NAME: &str = "taskqueue";

/// Candidate paths in probe order: ambient PATH lookup, the per-user local
/// bin, then the two project virtualenv layouts.
///
/// When `HOME` is unset the local-bin candidate degrades to a root-anchored
/// path that never matches; it stays in the list rather than being
/// special-cased.
fn candidates(working_dir: &Path) -> Vec<String> {
    let home = std::env::var("HOME").unwrap_or_default();
    vec![
        CLI_NAME.to_string(),
        format!("{}/.local/bin/{}", home, CLI_NAME),
        format!("{}/venv/bin/{}", working_dir.display(), CLI_NAME),
        format!("{}/.venv/bin/{}", working_dir.display(), CLI_NAME),
    ]
}

/// Resolve a working taskqueue executable, or `None` if no candidate passes
/// the version probe. Probe-level faults (missing binary, not executable)
/// count as non-matches and are never propagated.
pub async fn detect(shell: &dyn Shell, working_dir: &Path) -> Option<String> {
    for candidate in candidates(working_dir) {
        let probe = format!("{} --version", candidate);
        match shell.run(&probe, working_dir, DEFAULT_TIMEOUT_MS).await {
            Ok(out) if out.exit_code == 0 => {
                tracing::info!("Located taskqueue at {}", candidate);
                return Some(candidate);
            }
            Ok(out) => {
                tracing::debug!(
                    "Candidate {} failed version probe (exit {})",
                    candidate,
                    out.exit_code
                );
            }
            Err(fault) => {
                tracing::debug!("Candidate {} not invocable: {}", candidate, fault.message);
            }
        }
    }
    tracing::warn!("taskqueue CLI not found in any candidate location");
    None
}

/// User-facing guidance for the "not installed" outcome.
pub fn install_guidance() -> String {
    format!(
        "The {} CLI was not found. Install it (e.g. `pip install {}` or your \
         project's virtualenv) and make sure it is on PATH or under \
         ~/.local/bin, ./venv/bin, or ./.venv/bin.",
        CLI_NAME, CLI_NAME
    )
}

//! # taskqueue-bridge
//!
//! Thin integration layer exposing the external `taskqueue` CLI as callable
//! tools inside a host agent runtime.
//!
//! All queue logic, persistence, scheduling, and memory search live in the
//! wrapped CLI. This crate only locates the executable, marshals arguments,
//! invokes the process, and reshapes its text output into structured results.
//!
//! ## Architecture
//!
//! ```text
//!   host runtime ──▶ ToolRegistry ──▶ TaskQueueCli (adapter) ──▶ Shell ──▶ taskqueue
//!                                          ▲
//!                        locator::detect ──┘  (resolved once per session)
//! ```
//!
//! ## Modules
//! - `locator`: ordered-candidate discovery of the taskqueue executable
//! - `adapter`: typed operations over the CLI, normalized into `CommandResult`
//! - `shell`: the process-invocation seam (`Shell` trait + `SystemShell`)
//! - `tools`: agent-facing tool handlers and registry
//! - `settings`: host-owned settings passed through to the tools

pub mod adapter;
pub mod config;
pub mod locator;
pub mod settings;
pub mod shell;
pub mod tools;

pub use adapter::{
    AddOptions, CommandResult, ListOptions, Priority, RecallOptions, RunOptions, TaskQueueCli,
};
pub use config::Config;
pub use settings::{BridgeSettings, SettingsStore};
pub use shell::{ProcessFault, ProcessOutput, Shell, SystemShell};

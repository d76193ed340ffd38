//! Command adapter for the taskqueue CLI.
//!
//! Translates structured operation calls (add, list, recall, run, ...) into
//! argument vectors, shells out through the [`Shell`] capability, and
//! normalizes the outcome into a [`CommandResult`]. All invocation faults are
//! absorbed here; callers never see an `Err` from an adapter operation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::shell::Shell;

/// Default timeout for adapter operations.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Extended timeout for `run`, which processes the whole queue.
pub const RUN_TIMEOUT_MS: u64 = 300_000;

/// Uniform outcome of every adapter operation.
///
/// `success` is exactly `exit_code == 0`; stdout/stderr are trimmed. A
/// semantic failure reported by the CLI (unknown task id, etc.) looks like a
/// completed invocation with a non-zero exit code; this layer does not parse
/// the CLI's error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Options for `add`. Unset fields emit no flag.
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    pub task_type: Option<String>,
    pub priority: Option<u32>,
    pub urgent: bool,
    pub description: Option<String>,
    pub triage: bool,
}

/// Options for `list`. A `status` of `"all"` is treated as unset.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub status: Option<String>,
    pub task_type: Option<String>,
    pub priority: Option<u32>,
    pub limit: Option<u32>,
}

/// Options for `recall`. A `memory_type` of `"all"` is treated as unset.
#[derive(Debug, Clone, Default)]
pub struct RecallOptions {
    pub memory_type: Option<String>,
    pub limit: Option<u32>,
}

/// Options for `run`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub validate: bool,
}

/// Priority argument for the `priority` operation: either a numeric value
/// (`--priority N`) or a named level (`--high`, `--low`, ...).
#[derive(Debug, Clone)]
pub enum Priority {
    Named(String),
    Numeric(u32),
}

/// Replace every literal `"` with `\"` so free text can sit inside a quoted
/// shell token.
fn escape_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

/// Wrap free text in a quoted token with embedded quotes escaped.
fn quoted(text: &str) -> String {
    format!("\"{}\"", escape_quotes(text))
}

/// Adapter bound to a resolved executable path and a working directory.
///
/// Stateless beyond the construction triple; concurrent operations each spawn
/// their own child process and share nothing.
pub struct TaskQueueCli {
    executable: String,
    working_dir: PathBuf,
    shell: Arc<dyn Shell>,
}

impl TaskQueueCli {
    pub fn new(
        executable: impl Into<String>,
        working_dir: impl Into<PathBuf>,
        shell: Arc<dyn Shell>,
    ) -> Self {
        Self {
            executable: executable.into(),
            working_dir: working_dir.into(),
            shell,
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Run the CLI with `args`, normalizing every outcome into a
    /// [`CommandResult`]. This is the single error-handling seam for the
    /// adapter: invocation faults (spawn failure, timeout) become a failed
    /// result instead of propagating.
    pub async fn exec(&self, args: &[String], timeout_ms: Option<u64>) -> CommandResult {
        let timeout = timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
        let command = std::iter::once(self.executable.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");

        match self.shell.run(&command, &self.working_dir, timeout).await {
            Ok(out) => CommandResult {
                success: out.exit_code == 0,
                exit_code: out.exit_code,
                stdout: out.stdout.trim().to_string(),
                stderr: out.stderr.trim().to_string(),
            },
            Err(fault) => {
                tracing::debug!("taskqueue invocation fault: {}", fault.message);
                let stderr = fault
                    .stderr
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| {
                        if fault.message.is_empty() {
                            "Unknown error".to_string()
                        } else {
                            fault.message.clone()
                        }
                    });
                CommandResult {
                    success: false,
                    exit_code: fault.exit_code.unwrap_or(-1),
                    stdout: fault.stdout.unwrap_or_default().trim().to_string(),
                    stderr: stderr.trim().to_string(),
                }
            }
        }
    }

    pub async fn add(&self, title: &str, options: &AddOptions) -> CommandResult {
        self.exec(&add_args(title, options), None).await
    }

    pub async fn list(&self, options: &ListOptions) -> CommandResult {
        self.exec(&list_args(options), None).await
    }

    pub async fn view(&self, task_id: &str) -> CommandResult {
        self.exec(&["view".to_string(), task_id.to_string()], None)
            .await
    }

    pub async fn remove(&self, task_id: &str) -> CommandResult {
        self.exec(
            &[
                "remove".to_string(),
                task_id.to_string(),
                "--yes".to_string(),
            ],
            None,
        )
        .await
    }

    pub async fn priority(&self, task_id: &str, level: &Priority) -> CommandResult {
        self.exec(&priority_args(task_id, level), None).await
    }

    pub async fn status(&self) -> CommandResult {
        self.exec(&["status".to_string()], None).await
    }

    pub async fn recall(&self, query: &str, options: &RecallOptions) -> CommandResult {
        self.exec(&recall_args(query, options), None).await
    }

    pub async fn remember(&self, content: &str, memory_type: &str) -> CommandResult {
        self.exec(
            &[
                "remember".to_string(),
                quoted(content),
                "--type".to_string(),
                memory_type.to_string(),
            ],
            None,
        )
        .await
    }

    /// Process the queue once. Uses the extended timeout; a full run can take
    /// minutes while every other operation returns in seconds.
    pub async fn run(&self, options: &RunOptions) -> CommandResult {
        self.exec(&run_args(options), Some(RUN_TIMEOUT_MS)).await
    }

    pub async fn export_context(&self) -> CommandResult {
        self.exec(&["export-context".to_string()], None).await
    }
}

fn add_args(title: &str, options: &AddOptions) -> Vec<String> {
    let mut args = vec!["add".to_string(), quoted(title)];
    if let Some(task_type) = &options.task_type {
        args.push("--type".to_string());
        args.push(task_type.clone());
    }
    if let Some(priority) = options.priority {
        args.push("--priority".to_string());
        args.push(priority.to_string());
    }
    if options.urgent {
        args.push("--urgent".to_string());
    }
    if let Some(description) = &options.description {
        args.push("--description".to_string());
        args.push(quoted(description));
    }
    if options.triage {
        args.push("--triage".to_string());
    }
    args
}

fn list_args(options: &ListOptions) -> Vec<String> {
    let mut args = vec!["list".to_string()];
    // "all" is the CLI's own default; sending it would be redundant.
    if let Some(status) = options.status.as_deref().filter(|s| *s != "all") {
        args.push("--status".to_string());
        args.push(status.to_string());
    }
    if let Some(task_type) = &options.task_type {
        args.push("--type".to_string());
        args.push(task_type.clone());
    }
    if let Some(priority) = options.priority {
        args.push("--priority".to_string());
        args.push(priority.to_string());
    }
    if let Some(limit) = options.limit {
        args.push("--limit".to_string());
        args.push(limit.to_string());
    }
    args
}

fn priority_args(task_id: &str, level: &Priority) -> Vec<String> {
    let mut args = vec!["priority".to_string(), task_id.to_string()];
    match level {
        Priority::Numeric(value) => {
            args.push("--priority".to_string());
            args.push(value.to_string());
        }
        Priority::Named(name) => {
            args.push(format!("--{}", name));
        }
    }
    args
}

fn recall_args(query: &str, options: &RecallOptions) -> Vec<String> {
    let mut args = vec!["recall".to_string(), quoted(query)];
    if let Some(memory_type) = options.memory_type.as_deref().filter(|t| *t != "all") {
        args.push("--type".to_string());
        args.push(memory_type.to_string());
    }
    if let Some(limit) = options.limit {
        args.push("--limit".to_string());
        args.push(limit.to_string());
    }
    args
}

fn run_args(options: &RunOptions) -> Vec<String> {
    let mut args = vec!["run".to_string(), "--once".to_string()];
    if options.dry_run {
        args.push("--dry-run".to_string());
    }
    if options.validate {
        args.push("--validate".to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{ProcessFault, ProcessOutput};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted shell double that records every invocation.
    struct MockShell {
        result: Result<ProcessOutput, ProcessFault>,
        calls: Mutex<Vec<(String, u64)>>,
    }

    impl MockShell {
        fn ok(exit_code: i32, stdout: &str, stderr: &str) -> Self {
            Self {
                result: Ok(ProcessOutput {
                    exit_code,
                    stdout: stdout.to_string(),
                    stderr: stderr.to_string(),
                }),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn fault(fault: ProcessFault) -> Self {
            Self {
                result: Err(fault),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, u64)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl crate::shell::Shell for MockShell {
        async fn run(
            &self,
            command: &str,
            _cwd: &std::path::Path,
            timeout_ms: u64,
        ) -> Result<ProcessOutput, ProcessFault> {
            self.calls
                .lock()
                .unwrap()
                .push((command.to_string(), timeout_ms));
            self.result.clone()
        }
    }

    fn cli(shell: Arc<MockShell>) -> TaskQueueCli {
        TaskQueueCli::new("taskqueue", "/tmp", shell)
    }

    // ── Argument construction ──────────────────────────────────────

    #[test]
    fn add_escapes_quotes_in_title_and_description() {
        let options = AddOptions {
            description: Some(r#"see "notes""#.to_string()),
            ..Default::default()
        };
        let args = add_args(r#"fix "login" bug"#, &options);
        assert_eq!(args[0], "add");
        assert_eq!(args[1], r#""fix \"login\" bug""#);
        assert_eq!(args[3], r#""see \"notes\"""#);
        // No unescaped quote survives inside any token.
        for arg in &args {
            let inner = arg.trim_matches('"');
            let mut prev_backslash = false;
            for c in inner.chars() {
                if c == '"' {
                    assert!(prev_backslash, "unescaped quote in {:?}", arg);
                }
                prev_backslash = c == '\\';
            }
        }
    }

    #[test]
    fn add_includes_only_set_fields() {
        let options = AddOptions {
            task_type: Some("bug".to_string()),
            priority: Some(2),
            urgent: true,
            description: None,
            triage: false,
        };
        assert_eq!(
            add_args("title", &options),
            vec!["add", "\"title\"", "--type", "bug", "--priority", "2", "--urgent"]
        );
    }

    #[test]
    fn add_with_defaults_is_bare() {
        assert_eq!(add_args("t", &AddOptions::default()), vec!["add", "\"t\""]);
    }

    #[test]
    fn add_priority_zero_is_still_emitted() {
        let options = AddOptions {
            priority: Some(0),
            ..Default::default()
        };
        assert_eq!(
            add_args("t", &options),
            vec!["add", "\"t\"", "--priority", "0"]
        );
    }

    #[test]
    fn list_omits_status_all() {
        let options = ListOptions {
            status: Some("all".to_string()),
            ..Default::default()
        };
        assert_eq!(list_args(&options), vec!["list"]);
    }

    #[test]
    fn list_includes_non_sentinel_status_and_limit() {
        let options = ListOptions {
            status: Some("pending".to_string()),
            task_type: None,
            priority: None,
            limit: Some(10),
        };
        assert_eq!(
            list_args(&options),
            vec!["list", "--status", "pending", "--limit", "10"]
        );
    }

    #[test]
    fn recall_omits_type_all() {
        let options = RecallOptions {
            memory_type: Some("all".to_string()),
            limit: None,
        };
        assert_eq!(
            recall_args("api design", &options),
            vec!["recall", "\"api design\""]
        );
    }

    #[test]
    fn recall_includes_type_and_limit() {
        let options = RecallOptions {
            memory_type: Some("decision".to_string()),
            limit: Some(3),
        };
        assert_eq!(
            recall_args("auth", &options),
            vec!["recall", "\"auth\"", "--type", "decision", "--limit", "3"]
        );
    }

    #[test]
    fn priority_named_level_becomes_a_flag() {
        assert_eq!(
            priority_args("t1", &Priority::Named("high".to_string())),
            vec!["priority", "t1", "--high"]
        );
    }

    #[test]
    fn priority_numeric_uses_priority_flag() {
        assert_eq!(
            priority_args("t1", &Priority::Numeric(3)),
            vec!["priority", "t1", "--priority", "3"]
        );
    }

    #[test]
    fn run_args_include_flags_when_set() {
        let options = RunOptions {
            dry_run: true,
            validate: true,
        };
        assert_eq!(
            run_args(&options),
            vec!["run", "--once", "--dry-run", "--validate"]
        );
        assert_eq!(run_args(&RunOptions::default()), vec!["run", "--once"]);
    }

    // ── exec normalization ─────────────────────────────────────────

    #[tokio::test]
    async fn exec_trims_output_and_maps_exit_code() {
        let shell = Arc::new(MockShell::ok(0, "  done \n", "\n"));
        let result = cli(Arc::clone(&shell)).status().await;
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "done");
        assert_eq!(result.stderr, "");
        assert_eq!(shell.calls()[0].0, "taskqueue status");
    }

    #[tokio::test]
    async fn exec_nonzero_exit_is_unsuccessful_but_not_a_fault() {
        let shell = Arc::new(MockShell::ok(1, "", "no such task: t9"));
        let result = cli(shell).view("t9").await;
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stderr, "no such task: t9");
    }

    #[tokio::test]
    async fn exec_fault_with_full_fields() {
        let shell = Arc::new(MockShell::fault(ProcessFault {
            exit_code: Some(127),
            stdout: None,
            stderr: Some("command not found".to_string()),
            message: "spawn failed".to_string(),
        }));
        let result = cli(shell).status().await;
        assert_eq!(
            result,
            CommandResult {
                success: false,
                exit_code: 127,
                stdout: String::new(),
                stderr: "command not found".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn exec_fault_falls_back_to_message() {
        let shell = Arc::new(MockShell::fault(ProcessFault {
            exit_code: None,
            stdout: None,
            stderr: None,
            message: "timed out".to_string(),
        }));
        let result = cli(shell).status().await;
        assert!(!result.success);
        assert_eq!(result.exit_code, -1);
        assert_eq!(result.stdout, "");
        assert_eq!(result.stderr, "timed out");
    }

    #[tokio::test]
    async fn exec_fault_with_nothing_reports_unknown_error() {
        let shell = Arc::new(MockShell::fault(ProcessFault {
            exit_code: None,
            stdout: None,
            stderr: Some(String::new()),
            message: String::new(),
        }));
        let result = cli(shell).status().await;
        assert_eq!(result.stderr, "Unknown error");
    }

    // ── Timeouts ───────────────────────────────────────────────────

    #[tokio::test]
    async fn default_timeout_applies_to_ordinary_operations() {
        let shell = Arc::new(MockShell::ok(0, "", ""));
        let adapter = cli(Arc::clone(&shell));
        adapter.list(&ListOptions::default()).await;
        adapter.remember("fact", "learning").await;
        adapter.export_context().await;
        for (_, timeout) in shell.calls() {
            assert_eq!(timeout, DEFAULT_TIMEOUT_MS);
        }
    }

    #[tokio::test]
    async fn run_uses_extended_timeout() {
        let shell = Arc::new(MockShell::ok(0, "", ""));
        cli(Arc::clone(&shell)).run(&RunOptions::default()).await;
        let calls = shell.calls();
        assert_eq!(calls[0].0, "taskqueue run --once");
        assert_eq!(calls[0].1, RUN_TIMEOUT_MS);
    }

    // ── Full command strings ───────────────────────────────────────

    #[tokio::test]
    async fn remove_builds_exact_command() {
        let shell = Arc::new(MockShell::ok(0, "removed", ""));
        cli(Arc::clone(&shell)).remove("abc").await;
        assert_eq!(shell.calls()[0].0, "taskqueue remove abc --yes");
    }

    #[tokio::test]
    async fn remember_quotes_content_and_passes_type() {
        let shell = Arc::new(MockShell::ok(0, "", ""));
        cli(Arc::clone(&shell))
            .remember(r#"use "rustls" not openssl"#, "decision")
            .await;
        assert_eq!(
            shell.calls()[0].0,
            r#"taskqueue remember "use \"rustls\" not openssl" --type decision"#
        );
    }
}

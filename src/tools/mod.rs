//! Tool layer exposing the taskqueue CLI to the host agent runtime.
//!
//! Every tool is a thin handler: deserialize arguments, call the adapter,
//! format the [`CommandResult`](crate::adapter::CommandResult) for the agent.
//! Queue semantics live entirely in the wrapped CLI.

pub mod memory;
pub mod tasks;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::adapter::{CommandResult, TaskQueueCli};
use crate::settings::SharedSettingsStore;

/// Information about a tool for display purposes.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// Trait for implementing tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool.
    fn name(&self) -> &str;

    /// A description of what this tool does.
    fn description(&self) -> &str;

    /// JSON schema for the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value) -> anyhow::Result<String>;
}

/// Render a CommandResult for the agent.
///
/// Success passes the CLI's stdout through; failure surfaces the exit code
/// and stderr without interpreting the CLI's error text.
pub(crate) fn render(result: &CommandResult) -> String {
    if result.success {
        if result.stdout.is_empty() {
            "(no output)".to_string()
        } else {
            result.stdout.clone()
        }
    } else {
        let detail = if result.stderr.is_empty() {
            result.stdout.as_str()
        } else {
            result.stderr.as_str()
        };
        format!("taskqueue exited with code {}: {}", result.exit_code, detail)
    }
}

/// Registry of available tools, bound to one located CLI instance.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Build the registry for a located adapter.
    ///
    /// Callers resolve the executable first; when the CLI is not installed
    /// there is no registry to build and the host should surface
    /// [`install_guidance`](crate::locator::install_guidance) instead.
    pub fn new(cli: Arc<TaskQueueCli>, settings: SharedSettingsStore) -> Self {
        let mut tools: HashMap<String, Arc<dyn Tool>> = HashMap::new();

        // Task operations
        tools.insert(
            "add_task".to_string(),
            Arc::new(tasks::AddTask::new(Arc::clone(&cli))),
        );
        tools.insert(
            "list_tasks".to_string(),
            Arc::new(tasks::ListTasks::new(Arc::clone(&cli))),
        );
        tools.insert(
            "view_task".to_string(),
            Arc::new(tasks::ViewTask::new(Arc::clone(&cli))),
        );
        tools.insert(
            "remove_task".to_string(),
            Arc::new(tasks::RemoveTask::new(Arc::clone(&cli))),
        );
        tools.insert(
            "set_task_priority".to_string(),
            Arc::new(tasks::SetTaskPriority::new(Arc::clone(&cli))),
        );
        tools.insert(
            "queue_status".to_string(),
            Arc::new(tasks::QueueStatus::new(Arc::clone(&cli))),
        );
        tools.insert(
            "run_queue".to_string(),
            Arc::new(tasks::RunQueue::new(Arc::clone(&cli))),
        );
        tools.insert(
            "export_context".to_string(),
            Arc::new(tasks::ExportContext::new(Arc::clone(&cli))),
        );

        // Memory operations
        tools.insert(
            "recall_memory".to_string(),
            Arc::new(memory::RecallMemory::new(
                Arc::clone(&cli),
                Arc::clone(&settings),
            )),
        );
        tools.insert(
            "remember".to_string(),
            Arc::new(memory::Remember::new(cli, settings)),
        );

        tracing::info!("Tool registry ready with {} tools", tools.len());
        Self { tools }
    }

    /// List all available tools.
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .values()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    /// Check if a tool exists by name.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, args: Value) -> anyhow::Result<String> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;

        tool.execute(args).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::shell::{ProcessFault, ProcessOutput, Shell};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    /// Shell double returning one scripted output for every invocation.
    pub struct ScriptedShell {
        pub output: ProcessOutput,
        pub commands: Mutex<Vec<String>>,
    }

    impl ScriptedShell {
        pub fn succeeding(stdout: &str) -> Self {
            Self {
                output: ProcessOutput {
                    exit_code: 0,
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                },
                commands: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(exit_code: i32, stderr: &str) -> Self {
            Self {
                output: ProcessOutput {
                    exit_code,
                    stdout: String::new(),
                    stderr: stderr.to_string(),
                },
                commands: Mutex::new(Vec::new()),
            }
        }

        pub fn last_command(&self) -> String {
            self.commands.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl Shell for ScriptedShell {
        async fn run(
            &self,
            command: &str,
            _cwd: &Path,
            _timeout_ms: u64,
        ) -> Result<ProcessOutput, ProcessFault> {
            self.commands.lock().unwrap().push(command.to_string());
            Ok(self.output.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsStore;
    use test_support::ScriptedShell;

    async fn registry(shell: Arc<ScriptedShell>) -> ToolRegistry {
        let dir = std::env::temp_dir();
        let cli = Arc::new(TaskQueueCli::new("taskqueue", dir.clone(), shell));
        let settings = Arc::new(SettingsStore::new(&dir).await);
        ToolRegistry::new(cli, settings)
    }

    #[tokio::test]
    async fn registry_contains_all_operations() {
        let registry = registry(Arc::new(ScriptedShell::succeeding("ok"))).await;
        for name in [
            "add_task",
            "list_tasks",
            "view_task",
            "remove_task",
            "set_task_priority",
            "queue_status",
            "run_queue",
            "export_context",
            "recall_memory",
            "remember",
        ] {
            assert!(registry.has_tool(name), "missing tool {}", name);
        }
        assert_eq!(registry.list_tools().len(), 10);
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let registry = registry(Arc::new(ScriptedShell::succeeding("ok"))).await;
        let err = registry
            .execute("nope", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unknown tool"));
    }

    #[test]
    fn render_failure_includes_exit_code_and_stderr() {
        let result = CommandResult {
            success: false,
            exit_code: 2,
            stdout: String::new(),
            stderr: "no such task".to_string(),
        };
        assert_eq!(render(&result), "taskqueue exited with code 2: no such task");
    }

    #[test]
    fn render_success_passes_stdout_through() {
        let result = CommandResult {
            success: true,
            exit_code: 0,
            stdout: "3 tasks pending".to_string(),
            stderr: String::new(),
        };
        assert_eq!(render(&result), "3 tasks pending");
    }
}

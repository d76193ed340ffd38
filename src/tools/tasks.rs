//! Task-queue tools: create, inspect, and drive tasks through the CLI.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{render, Tool};
use crate::adapter::{AddOptions, ListOptions, Priority, RunOptions, TaskQueueCli};

/// Add a task to the queue.
pub struct AddTask {
    cli: Arc<TaskQueueCli>,
}

impl AddTask {
    pub fn new(cli: Arc<TaskQueueCli>) -> Self {
        Self { cli }
    }
}

#[derive(Debug, Deserialize)]
struct AddTaskArgs {
    title: String,
    #[serde(default)]
    task_type: Option<String>,
    #[serde(default)]
    priority: Option<u32>,
    #[serde(default)]
    urgent: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    triage: bool,
}

#[async_trait]
impl Tool for AddTask {
    fn name(&self) -> &str {
        "add_task"
    }

    fn description(&self) -> &str {
        "Add a task to the autonomous task queue. The queue processes tasks in the background; use run_queue to process immediately."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Short task title"
                },
                "task_type": {
                    "type": "string",
                    "description": "Optional: task category (e.g. 'bug', 'feature', 'chore')"
                },
                "priority": {
                    "type": "integer",
                    "description": "Optional: numeric priority"
                },
                "urgent": {
                    "type": "boolean",
                    "description": "Mark the task urgent (default: false)"
                },
                "description": {
                    "type": "string",
                    "description": "Optional: longer task description"
                },
                "triage": {
                    "type": "boolean",
                    "description": "Send the task through triage first (default: false)"
                }
            },
            "required": ["title"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let args: AddTaskArgs = serde_json::from_value(args)?;
        let options = AddOptions {
            task_type: args.task_type,
            priority: args.priority,
            urgent: args.urgent,
            description: args.description,
            triage: args.triage,
        };
        let result = self.cli.add(&args.title, &options).await;
        Ok(render(&result))
    }
}

/// List tasks in the queue.
pub struct ListTasks {
    cli: Arc<TaskQueueCli>,
}

impl ListTasks {
    pub fn new(cli: Arc<TaskQueueCli>) -> Self {
        Self { cli }
    }
}

#[derive(Debug, Deserialize)]
struct ListTasksArgs {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    task_type: Option<String>,
    #[serde(default)]
    priority: Option<u32>,
    #[serde(default)]
    limit: Option<u32>,
}

#[async_trait]
impl Tool for ListTasks {
    fn name(&self) -> &str {
        "list_tasks"
    }

    fn description(&self) -> &str {
        "List tasks in the queue, optionally filtered by status, type, or priority."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "status": {
                    "type": "string",
                    "description": "Optional: filter by status ('pending', 'done', ...). 'all' disables the filter."
                },
                "task_type": {
                    "type": "string",
                    "description": "Optional: filter by task type"
                },
                "priority": {
                    "type": "integer",
                    "description": "Optional: filter by numeric priority"
                },
                "limit": {
                    "type": "integer",
                    "description": "Optional: maximum number of tasks to return"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let args: ListTasksArgs = serde_json::from_value(args)?;
        let options = ListOptions {
            status: args.status,
            task_type: args.task_type,
            priority: args.priority,
            limit: args.limit,
        };
        let result = self.cli.list(&options).await;
        Ok(render(&result))
    }
}

/// View one task in detail.
pub struct ViewTask {
    cli: Arc<TaskQueueCli>,
}

impl ViewTask {
    pub fn new(cli: Arc<TaskQueueCli>) -> Self {
        Self { cli }
    }
}

#[derive(Debug, Deserialize)]
struct TaskIdArgs {
    task_id: String,
}

#[async_trait]
impl Tool for ViewTask {
    fn name(&self) -> &str {
        "view_task"
    }

    fn description(&self) -> &str {
        "Show full details of a single task by id."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "task_id": {
                    "type": "string",
                    "description": "The task id"
                }
            },
            "required": ["task_id"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let args: TaskIdArgs = serde_json::from_value(args)?;
        let result = self.cli.view(&args.task_id).await;
        Ok(render(&result))
    }
}

/// Remove a task from the queue.
pub struct RemoveTask {
    cli: Arc<TaskQueueCli>,
}

impl RemoveTask {
    pub fn new(cli: Arc<TaskQueueCli>) -> Self {
        Self { cli }
    }
}

#[async_trait]
impl Tool for RemoveTask {
    fn name(&self) -> &str {
        "remove_task"
    }

    fn description(&self) -> &str {
        "Remove a task from the queue by id. Removal is confirmed automatically."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "task_id": {
                    "type": "string",
                    "description": "The task id to remove"
                }
            },
            "required": ["task_id"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let args: TaskIdArgs = serde_json::from_value(args)?;
        let result = self.cli.remove(&args.task_id).await;
        Ok(render(&result))
    }
}

/// Change a task's priority.
pub struct SetTaskPriority {
    cli: Arc<TaskQueueCli>,
}

impl SetTaskPriority {
    pub fn new(cli: Arc<TaskQueueCli>) -> Self {
        Self { cli }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriorityValue {
    Numeric(u32),
    Named(String),
}

#[derive(Debug, Deserialize)]
struct SetPriorityArgs {
    task_id: String,
    priority: PriorityValue,
}

#[async_trait]
impl Tool for SetTaskPriority {
    fn name(&self) -> &str {
        "set_task_priority"
    }

    fn description(&self) -> &str {
        "Change a task's priority. Accepts a numeric value or a named level like 'high' or 'low'."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "task_id": {
                    "type": "string",
                    "description": "The task id"
                },
                "priority": {
                    "description": "Numeric priority or a named level ('high', 'medium', 'low')",
                    "oneOf": [
                        { "type": "integer" },
                        { "type": "string" }
                    ]
                }
            },
            "required": ["task_id", "priority"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let args: SetPriorityArgs = serde_json::from_value(args)?;
        let level = match args.priority {
            PriorityValue::Numeric(value) => Priority::Numeric(value),
            PriorityValue::Named(name) => Priority::Named(name),
        };
        let result = self.cli.priority(&args.task_id, &level).await;
        Ok(render(&result))
    }
}

/// Show queue status.
pub struct QueueStatus {
    cli: Arc<TaskQueueCli>,
}

impl QueueStatus {
    pub fn new(cli: Arc<TaskQueueCli>) -> Self {
        Self { cli }
    }
}

#[async_trait]
impl Tool for QueueStatus {
    fn name(&self) -> &str {
        "queue_status"
    }

    fn description(&self) -> &str {
        "Show queue status: pending/running/done counts and scheduler state."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: Value) -> anyhow::Result<String> {
        let result = self.cli.status().await;
        Ok(render(&result))
    }
}

/// Process the queue once.
pub struct RunQueue {
    cli: Arc<TaskQueueCli>,
}

impl RunQueue {
    pub fn new(cli: Arc<TaskQueueCli>) -> Self {
        Self { cli }
    }
}

#[derive(Debug, Deserialize)]
struct RunQueueArgs {
    #[serde(default)]
    dry_run: bool,
    #[serde(default)]
    validate: bool,
}

#[async_trait]
impl Tool for RunQueue {
    fn name(&self) -> &str {
        "run_queue"
    }

    fn description(&self) -> &str {
        "Process the task queue once. This is the longest-running operation and may take several minutes."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "dry_run": {
                    "type": "boolean",
                    "description": "Report what would run without executing (default: false)"
                },
                "validate": {
                    "type": "boolean",
                    "description": "Validate queue consistency while running (default: false)"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let args: RunQueueArgs = serde_json::from_value(args)?;
        let options = RunOptions {
            dry_run: args.dry_run,
            validate: args.validate,
        };
        let result = self.cli.run(&options).await;
        Ok(render(&result))
    }
}

/// Export queue context for session injection.
pub struct ExportContext {
    cli: Arc<TaskQueueCli>,
}

impl ExportContext {
    pub fn new(cli: Arc<TaskQueueCli>) -> Self {
        Self { cli }
    }
}

#[async_trait]
impl Tool for ExportContext {
    fn name(&self) -> &str {
        "export_context"
    }

    fn description(&self) -> &str {
        "Export the queue's context summary (active tasks, recent outcomes) for injection into a session."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: Value) -> anyhow::Result<String> {
        let result = self.cli.export_context().await;
        Ok(render(&result))
    }
}

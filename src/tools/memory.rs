//! Memory tools - recall and store learnings through the taskqueue CLI.
//!
//! These are the only tools that read host settings: the recall limit and
//! category filter default from [`BridgeSettings`](crate::settings::BridgeSettings),
//! and `remember` is a no-op when learning persistence is disabled.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{render, Tool};
use crate::adapter::{RecallOptions, TaskQueueCli};
use crate::settings::SharedSettingsStore;

/// Search the queue's memory for relevant past context.
pub struct RecallMemory {
    cli: Arc<TaskQueueCli>,
    settings: SharedSettingsStore,
}

impl RecallMemory {
    pub fn new(cli: Arc<TaskQueueCli>, settings: SharedSettingsStore) -> Self {
        Self { cli, settings }
    }
}

#[derive(Debug, Deserialize)]
struct RecallArgs {
    query: String,
    #[serde(default)]
    memory_type: Option<String>,
    #[serde(default)]
    limit: Option<u32>,
}

#[async_trait]
impl Tool for RecallMemory {
    fn name(&self) -> &str {
        "recall_memory"
    }

    fn description(&self) -> &str {
        "Search the task queue's memory for past decisions, learnings, and outcomes relevant to a query."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to search for (e.g. 'auth refactor decisions')"
                },
                "memory_type": {
                    "type": "string",
                    "description": "Optional: memory category to search. 'all' disables the filter. Defaults to the host's configured recall categories."
                },
                "limit": {
                    "type": "integer",
                    "description": "Optional: maximum results. Defaults to the host's configured context item count."
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let args: RecallArgs = serde_json::from_value(args)?;
        let settings = self.settings.get().await;

        let memory_type = args
            .memory_type
            .or_else(|| settings.recall_types.first().cloned());
        let limit = args.limit.unwrap_or(settings.context_items as u32);

        let options = RecallOptions {
            memory_type,
            limit: Some(limit),
        };
        let result = self.cli.recall(&args.query, &options).await;
        Ok(render(&result))
    }
}

/// Store a learning in the queue's memory.
pub struct Remember {
    cli: Arc<TaskQueueCli>,
    settings: SharedSettingsStore,
}

impl Remember {
    pub fn new(cli: Arc<TaskQueueCli>, settings: SharedSettingsStore) -> Self {
        Self { cli, settings }
    }
}

#[derive(Debug, Deserialize)]
struct RememberArgs {
    content: String,
    memory_type: String,
}

#[async_trait]
impl Tool for Remember {
    fn name(&self) -> &str {
        "remember"
    }

    fn description(&self) -> &str {
        "Store a fact, decision, or learning in the task queue's memory under a category."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The fact or learning to store"
                },
                "memory_type": {
                    "type": "string",
                    "description": "Memory category (e.g. 'decision', 'learning', 'preference')"
                }
            },
            "required": ["content", "memory_type"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let args: RememberArgs = serde_json::from_value(args)?;

        if !self.settings.get().await.persist_learnings {
            tracing::debug!("Skipping remember: learning persistence is disabled");
            return Ok("Learning persistence is disabled in settings; nothing stored.".to_string());
        }

        let result = self.cli.remember(&args.content, &args.memory_type).await;
        Ok(render(&result))
    }
}

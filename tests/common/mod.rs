#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ideaplan::gateway::{CompletionBackend, Gateway, GatewayError, RetryPolicy};
use ideaplan::prompts::Prompts;
use ideaplan::store::{ArtifactStore, SqliteStore};
use ideaplan::Pipeline;

/// Replays canned responses in order and records every prompt it receives.
#[derive(Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<String, GatewayError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_ok(&self, text: &str) {
        self.responses.lock().unwrap().push_back(Ok(text.to_string()));
    }

    pub fn push_err(&self, err: GatewayError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(GatewayError::Permanent {
                status: None,
                message: "no scripted response left".to_string(),
            })
        })
    }
}

pub fn memory_store() -> Arc<dyn ArtifactStore> {
    let store = SqliteStore::open_memory().expect("Failed to create in-memory database");
    store.migrate().expect("Failed to run migrations");
    Arc::new(store)
}

/// A pipeline over an in-memory store whose gateway never sleeps.
pub fn pipeline_with(backend: Arc<ScriptedBackend>) -> Pipeline {
    let gateway = Gateway::with_policy(backend, RetryPolicy::immediate());
    Pipeline::new(memory_store(), gateway, Prompts::embedded())
}

pub const QUESTIONS_RESPONSE: &str = "\
Here are some questions:
1. Which platforms should the app support?
2. Do users need accounts?
- **Should tasks sync across devices?**
";

pub const GRAPH_RESPONSE: &str = r#"```json
{
  "nodes": [
    {"id": "root", "label": "Todo app", "type": "idea", "priority": 5},
    {"id": "auth", "label": "Accounts", "type": "feature", "priority": 3, "notes": "email login"}
  ],
  "edges": [
    {"from": "root", "to": "auth", "relation": "has feature"}
  ]
}
```"#;

pub const PLAN_RESPONSE: &str = "```markdown\n# Plan\n\n1. Build accounts\n```";

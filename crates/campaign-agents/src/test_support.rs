//! Test support module providing stand-ins for the hosted services.
//!
//! `ScriptedModel` answers prompts by prefix and records every prompt it
//! receives; `RecordingStore` wraps any `TrendStore`. Both can write into a
//! shared `EventLog` so tests can assert on the order of remote calls.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use campaign_models::TrendDocument;
use campaign_store::{StoreError, TrendStore};
use tokio::sync::Mutex;

use crate::error::AgentError;
use crate::llm::LanguageModel;

/// Shared, ordered record of `start:<label>` / `end:<label>` events.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, event: impl Into<String>) {
        self.events.lock().await.push(event.into());
    }

    pub async fn events(&self) -> Vec<String> {
        self.events.lock().await.clone()
    }

    /// Position of the first occurrence of `event`.
    pub async fn position(&self, event: &str) -> Option<usize> {
        self.events.lock().await.iter().position(|e| e == event)
    }
}

enum Reply {
    Text(String),
    Fail,
}

struct Rule {
    prefix: String,
    label: String,
    reply: Reply,
    delay: Duration,
}

/// A language model that replies to prompts by matching their prefix.
pub struct ScriptedModel {
    rules: Vec<Rule>,
    prompts: Mutex<Vec<String>>,
    events: Option<EventLog>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            prompts: Mutex::new(Vec::new()),
            events: None,
        }
    }

    /// Reply with `response` to prompts starting with `prefix`.
    pub fn on(self, prefix: &str, response: &str) -> Self {
        self.rule(prefix, Reply::Text(response.to_string()), Duration::ZERO)
    }

    /// Like `on`, but wait `delay` before replying.
    pub fn on_after(self, prefix: &str, response: &str, delay: Duration) -> Self {
        self.rule(prefix, Reply::Text(response.to_string()), delay)
    }

    /// Fail prompts starting with `prefix` with an API error.
    pub fn fail_on(self, prefix: &str) -> Self {
        self.rule(prefix, Reply::Fail, Duration::ZERO)
    }

    /// Like `fail_on`, but wait `delay` before failing.
    pub fn fail_on_after(self, prefix: &str, delay: Duration) -> Self {
        self.rule(prefix, Reply::Fail, delay)
    }

    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    fn rule(mut self, prefix: &str, reply: Reply, delay: Duration) -> Self {
        let label = prefix
            .split_whitespace()
            .next()
            .unwrap_or(prefix)
            .to_lowercase();
        self.rules.push(Rule {
            prefix: prefix.to_string(),
            label,
            reply,
            delay,
        });
        self
    }

    /// Every prompt received, in arrival order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    async fn log(&self, event: String) {
        if let Some(events) = &self.events {
            events.push(event).await;
        }
    }
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String, AgentError> {
        self.prompts.lock().await.push(prompt.to_string());

        let Some(rule) = self.rules.iter().find(|r| prompt.starts_with(&r.prefix)) else {
            return Err(AgentError::Api {
                status: 400,
                message: format!("no scripted reply for prompt: {prompt}"),
            });
        };

        self.log(format!("start:{}", rule.label)).await;
        if !rule.delay.is_zero() {
            tokio::time::sleep(rule.delay).await;
        }
        self.log(format!("end:{}", rule.label)).await;

        match &rule.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail => Err(AgentError::Api {
                status: 500,
                message: "scripted failure".to_string(),
            }),
        }
    }
}

/// Wraps a trend store, logging `start:search` / `end:search` around each query.
pub struct RecordingStore {
    inner: Arc<dyn TrendStore>,
    events: EventLog,
    delay: Duration,
}

impl RecordingStore {
    pub fn new(inner: Arc<dyn TrendStore>, events: EventLog) -> Self {
        Self {
            inner,
            events,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl TrendStore for RecordingStore {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<TrendDocument>, StoreError> {
        self.events.push("start:search").await;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let result = self.inner.search(query, k).await;
        self.events.push("end:search").await;
        result
    }

    async fn upsert(&self, documents: &[TrendDocument]) -> Result<usize, StoreError> {
        self.inner.upsert(documents).await
    }
}

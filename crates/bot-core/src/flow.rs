//! Conversation Flows
//!
//! A flow is a linear per-feature state machine: it prompts for inputs
//! one step at a time, validates each, and produces a result. Flows are
//! registered at startup and driven by the dispatcher.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::message::{ChatId, Incoming, Reply};
use crate::session::FlowState;

/// What the dispatcher should do with the flow after a step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepOutcome {
    /// Input rejected; stay on the current step and re-prompt
    Repeat,
    /// Input accepted; move to the next step
    Advance,
    /// Flow finished; clear the session's flow state
    Done,
}

/// Replies produced by one flow step, plus the step outcome
#[derive(Clone, Debug)]
pub struct FlowReply {
    pub replies: Vec<Reply>,
    pub outcome: StepOutcome,
}

impl FlowReply {
    pub fn repeat(reply: Reply) -> Self {
        Self {
            replies: vec![reply],
            outcome: StepOutcome::Repeat,
        }
    }

    pub fn advance(reply: Reply) -> Self {
        Self {
            replies: vec![reply],
            outcome: StepOutcome::Advance,
        }
    }

    pub fn done(replies: Vec<Reply>) -> Self {
        Self {
            replies,
            outcome: StepOutcome::Done,
        }
    }
}

/// Flow trait - implement one per bot feature
#[async_trait]
pub trait Flow: Send + Sync {
    /// Unique flow name; doubles as the menu entry callback datum
    fn name(&self) -> &str;

    /// One-line description for the menu
    fn description(&self) -> &str;

    /// First prompt sent when the flow is entered
    async fn enter(&self, chat: &ChatId) -> Result<Reply>;

    /// Handle user input for the current step (`state.step`)
    async fn handle(&self, state: &mut FlowState, input: &Incoming) -> Result<FlowReply>;
}

/// Registry for available flows
pub struct FlowRegistry {
    flows: HashMap<String, Arc<dyn Flow>>,
}

impl Default for FlowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self {
            flows: HashMap::new(),
        }
    }

    /// Register a new flow
    pub fn register<F: Flow + 'static>(&mut self, flow: F) {
        self.flows.insert(flow.name().to_string(), Arc::new(flow));
    }

    /// Get a flow by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Flow>> {
        self.flows.get(name).cloned()
    }

    /// Get flow names
    pub fn names(&self) -> Vec<&str> {
        self.flows.keys().map(String::as_str).collect()
    }

    /// Number of registered flows
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

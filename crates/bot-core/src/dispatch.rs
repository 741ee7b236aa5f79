//! Dispatcher
//!
//! Routes incoming chat events to the right flow. One linear flow can be
//! active per chat; entry callbacks start (or restart) a flow, everything
//! else is handed to the active flow's current step.

use std::sync::Arc;

use crate::error::{BotError, Result};
use crate::flow::{FlowRegistry, StepOutcome};
use crate::message::{ChatId, Incoming, Reply};
use crate::session::{ChatSession, SessionStore};

/// Dispatcher configuration
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Menu reply sent on /start
    pub welcome: Reply,

    /// Text sent when no flow is active and the input matches nothing
    pub fallback: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            welcome: Reply::text("Welcome!"),
            fallback: "Send /start to see the menu.".into(),
        }
    }
}

/// The conversation orchestrator
pub struct Dispatcher {
    flows: Arc<FlowRegistry>,
    sessions: Arc<dyn SessionStore>,
    config: DispatcherConfig,
}

impl Dispatcher {
    /// Create a new dispatcher
    pub fn new(
        flows: Arc<FlowRegistry>,
        sessions: Arc<dyn SessionStore>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            flows,
            sessions,
            config,
        }
    }

    /// Handle one incoming event for a chat, returning the replies to send
    pub async fn handle(&self, chat: &ChatId, input: Incoming) -> Result<Vec<Reply>> {
        let mut session = self
            .sessions
            .load(chat)?
            .unwrap_or_else(|| ChatSession::new(chat.clone()));

        let replies = self.route(&mut session, chat, &input).await?;

        session.touch();
        self.sessions.save(&session)?;

        Ok(replies)
    }

    async fn route(
        &self,
        session: &mut ChatSession,
        chat: &ChatId,
        input: &Incoming,
    ) -> Result<Vec<Reply>> {
        // Menu entry: /start command or the "start" callback
        let wants_menu = matches!(input, Incoming::Command(c) if c == "start")
            || matches!(input, Incoming::Callback(d) if d == "start");
        if wants_menu {
            session.end_flow();
            return Ok(vec![self.config.welcome.clone()]);
        }

        // Entry callbacks start a flow; re-entry mid-flow restarts it
        if let Some(data) = input.callback() {
            if let Some(flow) = self.flows.get(data) {
                tracing::debug!(flow = %flow.name(), chat = %chat, "Entering flow");
                session.begin_flow(flow.name());
                let reply = flow.enter(chat).await?;
                return Ok(vec![reply]);
            }
        }

        // Everything else belongs to the active flow
        if let Some(state) = session.flow.as_mut() {
            let Some(flow) = self.flows.get(&state.flow) else {
                let name = state.flow.clone();
                session.end_flow();
                return Err(BotError::FlowNotFound(name));
            };

            return match flow.handle(state, input).await {
                Ok(reply) => {
                    match reply.outcome {
                        StepOutcome::Repeat => {}
                        StepOutcome::Advance => state.step += 1,
                        StepOutcome::Done => session.end_flow(),
                    }
                    Ok(reply.replies)
                }
                Err(e) => {
                    tracing::warn!(flow = %state.flow, error = %e, "Flow failed");
                    session.end_flow();
                    Ok(vec![Reply::text(e.user_message())])
                }
            };
        }

        Ok(vec![Reply::text(self.config.fallback.clone())])
    }

    /// Get the flow registry
    pub fn flows(&self) -> &FlowRegistry {
        &self.flows
    }

    /// Get configuration
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{Flow, FlowReply};
    use crate::session::{FlowState, MemorySessionStore};
    use async_trait::async_trait;

    /// Collects one number, then reports it doubled
    struct DoubleFlow;

    #[async_trait]
    impl Flow for DoubleFlow {
        fn name(&self) -> &str {
            "double"
        }

        fn description(&self) -> &str {
            "Double a number"
        }

        async fn enter(&self, _chat: &ChatId) -> Result<Reply> {
            Ok(Reply::text("Enter a number:"))
        }

        async fn handle(&self, _state: &mut FlowState, input: &Incoming) -> Result<FlowReply> {
            match input.text().and_then(|t| t.parse::<f64>().ok()) {
                Some(n) => Ok(FlowReply::done(vec![Reply::text(format!("{}", n * 2.0))])),
                None => Ok(FlowReply::repeat(Reply::text("Not a number, try again:"))),
            }
        }
    }

    fn dispatcher() -> Dispatcher {
        let mut flows = FlowRegistry::new();
        flows.register(DoubleFlow);
        Dispatcher::new(
            Arc::new(flows),
            Arc::new(MemorySessionStore::new()),
            DispatcherConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_start_shows_menu() {
        let d = dispatcher();
        let chat = ChatId::from_string("c1");

        let replies = d
            .handle(&chat, Incoming::from_text("/start"))
            .await
            .unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].text, "Welcome!");
    }

    #[tokio::test]
    async fn test_flow_lifecycle() {
        let d = dispatcher();
        let chat = ChatId::from_string("c1");

        let replies = d
            .handle(&chat, Incoming::Callback("double".into()))
            .await
            .unwrap();
        assert_eq!(replies[0].text, "Enter a number:");

        // Invalid input repeats the step
        let replies = d.handle(&chat, Incoming::from_text("abc")).await.unwrap();
        assert_eq!(replies[0].text, "Not a number, try again:");

        // Valid input finishes the flow
        let replies = d.handle(&chat, Incoming::from_text("21")).await.unwrap();
        assert_eq!(replies[0].text, "42");

        // Flow is over; plain text falls through to the fallback
        let replies = d.handle(&chat, Incoming::from_text("21")).await.unwrap();
        assert_eq!(replies[0].text, "Send /start to see the menu.");
    }

    #[tokio::test]
    async fn test_reentry_restarts_flow() {
        let d = dispatcher();
        let chat = ChatId::from_string("c1");

        d.handle(&chat, Incoming::Callback("double".into()))
            .await
            .unwrap();

        // Entry callback mid-flow starts the flow over
        let replies = d
            .handle(&chat, Incoming::Callback("double".into()))
            .await
            .unwrap();
        assert_eq!(replies[0].text, "Enter a number:");

        let replies = d.handle(&chat, Incoming::from_text("21")).await.unwrap();
        assert_eq!(replies[0].text, "42");
    }

    #[tokio::test]
    async fn test_unknown_callback_falls_through() {
        let d = dispatcher();
        let chat = ChatId::from_string("c1");

        let replies = d
            .handle(&chat, Incoming::Callback("nope".into()))
            .await
            .unwrap();
        assert_eq!(replies[0].text, "Send /start to see the menu.");
    }
}

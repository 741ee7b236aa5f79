//! # bot-core
//!
//! Core chat bot logic: transport-agnostic messages, per-chat sessions,
//! and an extensible conversation flow engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Dispatcher                              │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │   Session   │  │    Flow     │  │   SessionStore      │  │
//! │  │   Routing   │──│   Registry  │──│   (per chat)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `Flow` trait enables adding bot features (RSI analysis, volatility,
//! risk/reward) without changing the routing logic.

pub mod dispatch;
pub mod error;
pub mod flow;
pub mod message;
pub mod session;

pub use dispatch::{Dispatcher, DispatcherConfig};
pub use error::{BotError, Result};
pub use flow::{Flow, FlowRegistry, FlowReply, StepOutcome};
pub use message::{Button, ChatId, Incoming, Keyboard, Photo, Reply};
pub use session::{ChatSession, FlowState, MemorySessionStore, SessionStore};

//! onde-chat: the conversational panel engine
//!
//! This crate owns the message lifecycle of the assistant panel: submitting a
//! question, waiting on the answer with a cycling ellipsis, and revealing the
//! answer character by character. The engine is an actor consuming commands
//! and timer ticks from a single channel, so every state transition happens
//! on one logical thread of control.

pub mod assistant;
pub mod conversation;
pub mod dots;
pub mod engine;
pub mod error;
pub mod events;
pub mod handle;
pub mod reveal;
pub mod ticker;
pub mod view;

pub use assistant::{Answer, Assistant, HttpAssistant};
pub use conversation::{Conversation, Message, MessageId, Sender};
pub use engine::{ChatConfig, ChatEngine, Phase};
pub use error::AskError;
pub use events::ChatEvent;
pub use handle::PanelHandle;
pub use ticker::Ticker;
pub use view::PanelView;

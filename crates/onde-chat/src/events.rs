//! Engine event types

use serde::{Deserialize, Serialize};

use crate::conversation::{MessageId, Sender};
use crate::engine::Phase;

/// Events emitted by the engine as the panel state changes.
///
/// The rendered view travels on the `watch` channel; these are for observers
/// that care about individual transitions (logging, tests).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// The panel became visible
    PanelOpened,

    /// The panel was dismissed
    PanelClosed,

    /// The conversation phase changed
    PhaseChanged { phase: Phase },

    /// A message was appended to the log
    MessageAppended { id: MessageId, sender: Sender },

    /// The loading ellipsis advanced
    DotsTick { count: u8 },

    /// An answer started revealing into the given message
    RevealStarted { id: MessageId },

    /// One more character of the answer was disclosed
    RevealProgress { id: MessageId, revealed: usize },

    /// The answer finished revealing
    RevealFinished { id: MessageId },
}

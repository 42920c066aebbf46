//! Read-only projection of the panel for the rendering layer

use crate::conversation::{Conversation, Message, MessageId};
use crate::dots::Dots;
use crate::engine::Phase;

/// Snapshot handed to the renderer after every state transition.
///
/// `input_enabled` and `close_disabled` are projections of `phase`, computed
/// here and nowhere else; they are never stored as independent state, so they
/// cannot disagree with the phase they derive from.
#[derive(Debug, Clone)]
pub struct PanelView {
    /// Whether the panel overlay is shown
    pub visible: bool,
    /// Current conversation phase
    pub phase: Phase,
    /// The conversation log, in display order
    pub messages: Vec<Message>,
    /// Rendered loading ellipsis while the indicator is active. `None` covers
    /// both idle phases and the settle gap between the dots disappearing and
    /// the answer starting to type.
    pub loading_dots: Option<String>,
    /// The message currently being typed into, if any
    pub revealing: Option<MessageId>,
    /// Whether the submit control accepts input
    pub input_enabled: bool,
    /// Whether the close affordance is disabled
    pub close_disabled: bool,
    /// Whether the suggestion row is shown
    pub suggestions_visible: bool,
}

impl PanelView {
    pub(crate) fn project(
        visible: bool,
        conversation: &Conversation,
        phase: Phase,
        dots: &Dots,
        revealing: Option<MessageId>,
        keyboard_visible: bool,
    ) -> Self {
        Self {
            visible,
            phase,
            messages: conversation.messages().to_vec(),
            loading_dots: dots.is_running().then(|| dots.text()),
            revealing,
            input_enabled: phase == Phase::Idle,
            close_disabled: phase == Phase::Revealing,
            suggestions_visible: !keyboard_visible,
        }
    }
}

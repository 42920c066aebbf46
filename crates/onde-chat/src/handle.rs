//! A cloneable handle for driving the panel from outside the engine task.

use tokio::sync::{broadcast, mpsc, watch};

use crate::engine::Command;
use crate::events::ChatEvent;
use crate::view::PanelView;

/// Handle to a running [`ChatEngine`](crate::engine::ChatEngine).
///
/// All operations are messages into the engine's channel; they never block on
/// the engine's work. Cloning is cheap.
#[derive(Clone)]
pub struct PanelHandle {
    pub(crate) commands: mpsc::Sender<Command>,
    pub(crate) events: broadcast::Sender<ChatEvent>,
    pub(crate) view: watch::Receiver<PanelView>,
}

impl PanelHandle {
    /// Show the panel.
    pub async fn open(&self) {
        let _ = self.commands.send(Command::Open).await;
    }

    /// Dismiss the panel. Refused by the engine while an answer is revealing.
    pub async fn close(&self) {
        let _ = self.commands.send(Command::Close).await;
    }

    /// Submit a question. Blank input and input while the panel is busy are
    /// silently rejected by the engine.
    pub async fn submit(&self, text: impl Into<String>) {
        let _ = self.commands.send(Command::Submit(text.into())).await;
    }

    /// Report whether the user is composing (the keyboard-visibility analog);
    /// toggles the suggestion row.
    pub async fn set_keyboard_visible(&self, visible: bool) {
        let _ = self.commands.send(Command::KeyboardVisible(visible)).await;
    }

    /// Tear the panel down: stops every driver and makes any in-flight
    /// continuation a no-op. The engine task exits afterwards.
    pub async fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown).await;
    }

    /// Subscribe to engine events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    /// The rendered view, republished after every state transition.
    pub fn view(&self) -> watch::Receiver<PanelView> {
        self.view.clone()
    }
}

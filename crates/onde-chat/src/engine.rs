//! The conversation state machine

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, watch};

use crate::assistant::{Answer, Assistant};
use crate::conversation::{Conversation, MessageId, Sender};
use crate::dots::{self, Dots};
use crate::error::AskError;
use crate::events::ChatEvent;
use crate::handle::PanelHandle;
use crate::reveal::{self, RevealJob, Revealer};
use crate::view::PanelView;

/// Conversation phase. Exactly one value at any instant, owned exclusively
/// by the engine; every gate in the panel derives from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No request in flight, no reveal in progress; input accepted
    #[default]
    Idle,
    /// A request is outstanding; input rejected, dots cycling
    Awaiting,
    /// An answer is typing out; input rejected, close refused
    Revealing,
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Assistant message seeding the conversation, if any
    pub greeting: Option<String>,
    /// Reply substituted when a successful payload carries no answer
    pub fallback_answer: String,
    /// Reply appended when the assistant answers with an error status
    pub failure_reply: String,
    /// Reply appended when the assistant cannot be reached
    pub unreachable_reply: String,
    /// Period of the loading ellipsis
    pub dot_period: Duration,
    /// Pause between a successful resolution and the first typed character
    pub settle_delay: Duration,
    /// Typing speed of the reveal, per character
    pub reveal_period: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: Some(
                "Bonjour, je suis votre assistant virtuel ! Comment puis-je vous aider aujourd'hui ?"
                    .to_string(),
            ),
            fallback_answer: "Je n'ai pas compris.".to_string(),
            failure_reply: "Désolé, une erreur s'est produite.".to_string(),
            unreachable_reply: "Désolé, impossible de contacter l'assistant.".to_string(),
            dot_period: dots::DOT_PERIOD,
            settle_delay: reveal::SETTLE_DELAY,
            reveal_period: reveal::REVEAL_PERIOD,
        }
    }
}

/// Everything the engine reacts to: user-facing commands from the handle and
/// the continuations its own timers and ask dispatches feed back in. One
/// channel, one consumer, so transitions happen on one logical thread.
#[derive(Debug)]
pub(crate) enum Command {
    Open,
    Close,
    Submit(String),
    KeyboardVisible(bool),
    Shutdown,
    /// `ask` resolved; `generation` was captured at dispatch time
    Resolved {
        generation: u64,
        result: Result<Answer, AskError>,
    },
    /// The settle delay elapsed, typing may begin
    BeginReveal { generation: u64 },
    /// The loading ellipsis driver fired
    DotsTick { generation: u64 },
    /// The reveal driver fired
    RevealTick { generation: u64 },
}

/// The conversational message-lifecycle engine.
///
/// Owns the log, the phase, both timers and the panel visibility. Built with
/// [`ChatEngine::new`] and consumed by [`ChatEngine::run`], which processes
/// commands until shutdown; interaction goes through the returned
/// [`PanelHandle`].
pub struct ChatEngine {
    config: ChatConfig,
    assistant: Arc<dyn Assistant>,
    conversation: Conversation,
    phase: Phase,
    dots: Dots,
    revealer: Revealer,
    /// Answer waiting out the settle delay: (target message, full text)
    pending_reveal: Option<(MessageId, String)>,
    visible: bool,
    keyboard_visible: bool,
    /// Liveness token: bumped on teardown so that continuations dispatched
    /// before it are discarded when they arrive after it.
    generation: u64,
    rx: mpsc::Receiver<Command>,
    tx: mpsc::Sender<Command>,
    events: broadcast::Sender<ChatEvent>,
    view_tx: watch::Sender<PanelView>,
}

impl ChatEngine {
    /// Create an engine and the handle that drives it. The engine does
    /// nothing until [`run`](Self::run) is awaited (typically via
    /// `tokio::spawn(engine.run())`).
    pub fn new(assistant: Arc<dyn Assistant>, config: ChatConfig) -> (PanelHandle, Self) {
        let (tx, rx) = mpsc::channel(64);
        let (events, _) = broadcast::channel(256);

        let mut conversation = Conversation::new();
        if let Some(greeting) = &config.greeting {
            conversation.push(Sender::Assistant, greeting.clone());
        }

        let dots = Dots::new();
        let initial = PanelView::project(false, &conversation, Phase::Idle, &dots, None, false);
        let (view_tx, view_rx) = watch::channel(initial);

        let handle = PanelHandle {
            commands: tx.clone(),
            events: events.clone(),
            view: view_rx,
        };

        let engine = Self {
            config,
            assistant,
            conversation,
            phase: Phase::Idle,
            dots,
            revealer: Revealer::new(),
            pending_reveal: None,
            visible: false,
            keyboard_visible: false,
            generation: 0,
            rx,
            tx,
            events,
            view_tx,
        };

        (handle, engine)
    }

    /// Process commands until shutdown (or until every handle is dropped).
    /// Tears down all timers on exit, whatever the phase.
    pub async fn run(mut self) {
        tracing::debug!("chat engine started");
        while let Some(command) = self.rx.recv().await {
            if matches!(command, Command::Shutdown) {
                break;
            }
            self.handle(command);
        }
        self.teardown();
        self.publish();
        tracing::debug!("chat engine stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Open => self.open(),
            Command::Close => self.close(),
            Command::Submit(text) => self.submit(text),
            Command::KeyboardVisible(visible) => self.keyboard_visible = visible,
            Command::Resolved { generation, result } => self.on_resolved(generation, result),
            Command::BeginReveal { generation } => self.on_begin_reveal(generation),
            Command::DotsTick { generation } => self.on_dots_tick(generation),
            Command::RevealTick { generation } => self.on_reveal_tick(generation),
            Command::Shutdown => unreachable!("handled by run()"),
        }
        self.publish();
    }

    fn open(&mut self) {
        if self.visible {
            return;
        }
        self.visible = true;
        self.emit(ChatEvent::PanelOpened);
    }

    /// Dismiss the panel. Refused outright while revealing: the affordance
    /// is rendered disabled, and a stray request must not slip through.
    /// Closing from any other phase tears the timers down and orphans the
    /// outstanding request, if any; the log survives for the next open.
    fn close(&mut self) {
        if !self.visible {
            return;
        }
        if self.phase == Phase::Revealing {
            tracing::debug!("close refused while revealing");
            return;
        }
        self.visible = false;
        self.teardown();
        self.emit(ChatEvent::PanelClosed);
    }

    /// Accept a question: append it, start waiting, dispatch `ask` once.
    /// Blank input and input outside `Idle` are rejected without any state
    /// change; this gate is what keeps requests single-flight.
    fn submit(&mut self, text: String) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        if self.phase != Phase::Idle {
            tracing::debug!(phase = ?self.phase, "submit rejected");
            return;
        }

        let id = self.conversation.push(Sender::User, trimmed);
        self.emit(ChatEvent::MessageAppended {
            id,
            sender: Sender::User,
        });
        self.set_phase(Phase::Awaiting);
        self.start_dots();
        self.dispatch_ask(trimmed.to_string());
    }

    fn start_dots(&mut self) {
        let generation = self.generation;
        let tx = self.tx.clone();
        self.dots.start(self.config.dot_period, move || {
            let _ = tx.try_send(Command::DotsTick { generation });
        });
    }

    fn dispatch_ask(&self, question: String) {
        let generation = self.generation;
        let assistant = Arc::clone(&self.assistant);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = assistant.ask(&question).await;
            let _ = tx.send(Command::Resolved { generation, result }).await;
        });
    }

    fn on_resolved(&mut self, generation: u64, result: Result<Answer, AskError>) {
        if generation != self.generation || self.phase != Phase::Awaiting {
            tracing::debug!("stale resolution discarded");
            return;
        }
        self.dots.stop();

        match result {
            Ok(payload) => {
                let text = payload
                    .answer
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| self.config.fallback_answer.clone());

                let id = self.conversation.push(Sender::Assistant, "");
                self.emit(ChatEvent::MessageAppended {
                    id,
                    sender: Sender::Assistant,
                });

                // Still Awaiting for the settle delay: the dots bubble
                // disappearing and the first typed character stay visually
                // distinct.
                self.pending_reveal = Some((id, text));
                let tx = self.tx.clone();
                let settle = self.config.settle_delay;
                tokio::spawn(async move {
                    tokio::time::sleep(settle).await;
                    let _ = tx.send(Command::BeginReveal { generation }).await;
                });
            }
            Err(error) => {
                tracing::warn!(%error, "ask failed");
                let reply = match error {
                    AskError::Status(_) => self.config.failure_reply.clone(),
                    AskError::Unreachable(_) => self.config.unreachable_reply.clone(),
                };
                let id = self.conversation.push(Sender::Assistant, reply);
                self.emit(ChatEvent::MessageAppended {
                    id,
                    sender: Sender::Assistant,
                });
                self.set_phase(Phase::Idle);
            }
        }
    }

    fn on_begin_reveal(&mut self, generation: u64) {
        if generation != self.generation {
            return;
        }
        let Some((target, full_text)) = self.pending_reveal.take() else {
            return;
        };

        self.revealer.begin(RevealJob::new(target, &full_text));
        self.set_phase(Phase::Revealing);
        self.emit(ChatEvent::RevealStarted { id: target });

        // First character lands with the phase change; the ticker paces the
        // rest. An empty answer completes right here.
        self.step_reveal();
        if self.revealer.is_active() {
            let tx = self.tx.clone();
            self.revealer
                .start_ticker(self.config.reveal_period, move || {
                    let _ = tx.try_send(Command::RevealTick { generation });
                });
        }
    }

    fn on_dots_tick(&mut self, generation: u64) {
        // A tick queued behind the resolution carries the live generation but
        // arrives after Awaiting ended; the phase guard drops it.
        if generation != self.generation || self.phase != Phase::Awaiting {
            return;
        }
        let count = self.dots.advance();
        self.emit(ChatEvent::DotsTick { count });
    }

    fn on_reveal_tick(&mut self, generation: u64) {
        if generation != self.generation {
            return;
        }
        self.step_reveal();
    }

    /// Disclose one more character of the active reveal, finishing the job
    /// when the prefix reaches the full answer. No-op without an active job.
    fn step_reveal(&mut self) {
        let Some(job) = self.revealer.job_mut() else {
            return;
        };
        let target = job.target();
        if job.is_complete() {
            self.finish_reveal(target);
            return;
        }

        let prefix = job.advance();
        let revealed = job.revealed();
        let complete = job.is_complete();

        if !self.conversation.set_text(target, &prefix) {
            // Messages are never deleted, so a missing target should not
            // happen; treat it as an already-finished reveal.
            tracing::warn!(id = target, "reveal target missing");
            self.finish_reveal(target);
            return;
        }

        self.emit(ChatEvent::RevealProgress {
            id: target,
            revealed,
        });
        if complete {
            self.finish_reveal(target);
        }
    }

    fn finish_reveal(&mut self, id: MessageId) {
        self.revealer.abort();
        self.emit(ChatEvent::RevealFinished { id });
        self.set_phase(Phase::Idle);
    }

    /// Stop every driver and invalidate outstanding continuations. Safe to
    /// call in any phase; idempotent.
    fn teardown(&mut self) {
        self.generation += 1;
        self.dots.stop();
        self.revealer.abort();
        self.pending_reveal = None;
        self.set_phase(Phase::Idle);
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            self.phase = phase;
            self.emit(ChatEvent::PhaseChanged { phase });
        }
    }

    fn emit(&self, event: ChatEvent) {
        let _ = self.events.send(event);
    }

    fn publish(&self) {
        self.view_tx.send_replace(PanelView::project(
            self.visible,
            &self.conversation,
            self.phase,
            &self.dots,
            self.revealer.target(),
            self.keyboard_visible,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::{advance, sleep};

    /// An assistant returning a canned reply, optionally after a delay.
    struct MockAssistant {
        reply: Mutex<Result<Answer, AskError>>,
        delay: Duration,
        calls: AtomicU32,
    }

    impl MockAssistant {
        fn answering(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Ok(Answer::text(text))),
                delay: Duration::ZERO,
                calls: AtomicU32::new(0),
            })
        }

        fn answering_after(text: &str, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Ok(Answer::text(text))),
                delay,
                calls: AtomicU32::new(0),
            })
        }

        fn failing(error: AskError) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Err(error)),
                delay: Duration::ZERO,
                calls: AtomicU32::new(0),
            })
        }

        fn empty_payload() -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Ok(Answer::default())),
                delay: Duration::ZERO,
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl Assistant for MockAssistant {
        async fn ask(&self, _question: &str) -> Result<Answer, AskError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if !self.delay.is_zero() {
                sleep(self.delay).await;
            }
            self.reply.lock().clone()
        }
    }

    fn test_config() -> ChatConfig {
        ChatConfig {
            greeting: None,
            ..ChatConfig::default()
        }
    }

    fn start(assistant: Arc<dyn Assistant>) -> PanelHandle {
        let (handle, engine) = ChatEngine::new(assistant, test_config());
        tokio::spawn(engine.run());
        handle
    }

    /// Receive events until `stop` matches, returning everything seen
    /// (including the match).
    async fn collect_until(
        events: &mut broadcast::Receiver<ChatEvent>,
        stop: impl Fn(&ChatEvent) -> bool,
    ) -> Vec<ChatEvent> {
        let mut seen = vec![];
        loop {
            let event = events.recv().await.expect("event stream closed");
            let done = stop(&event);
            seen.push(event);
            if done {
                return seen;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_submit_is_a_noop() {
        let handle = start(MockAssistant::answering("non"));
        handle.open().await;
        handle.submit("   ").await;
        handle.submit("").await;
        sleep(Duration::from_millis(50)).await;

        let view = handle.view().borrow().clone();
        assert!(view.messages.is_empty());
        assert_eq!(view.phase, Phase::Idle);
        assert!(view.input_enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_reveals_answer_prefix_by_prefix() {
        let handle = start(MockAssistant::answering("Bonjour"));
        let mut events = handle.subscribe();
        handle.open().await;
        handle.submit("Salut ?").await;

        let seen = collect_until(&mut events, |e| {
            matches!(e, ChatEvent::RevealFinished { .. })
        })
        .await;

        let progress: Vec<usize> = seen
            .iter()
            .filter_map(|e| match e {
                ChatEvent::RevealProgress { revealed, .. } => Some(*revealed),
                _ => None,
            })
            .collect();
        // Every prefix length exactly once, in order, no skips or repeats.
        assert_eq!(progress, (1..=7).collect::<Vec<_>>());

        let view = handle.view().borrow().clone();
        assert_eq!(view.messages.len(), 2);
        assert_eq!(view.messages[1].text, "Bonjour");
        assert_eq!(view.messages[1].sender, Sender::Assistant);
        assert_eq!(view.phase, Phase::Idle);
        assert!(view.input_enabled);
        assert!(!view.close_disabled);
        assert!(view.revealing.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dots_cycle_while_awaiting() {
        let assistant =
            MockAssistant::answering_after("Nous proposons...", Duration::from_millis(1700));
        let handle = start(assistant);
        let mut events = handle.subscribe();
        handle.open().await;
        handle.submit("Quels sont vos services ?").await;

        let seen = collect_until(&mut events, |e| {
            matches!(
                e,
                ChatEvent::MessageAppended {
                    sender: Sender::Assistant,
                    ..
                }
            )
        })
        .await;

        let counts: Vec<u8> = seen
            .iter()
            .filter_map(|e| match e {
                ChatEvent::DotsTick { count } => Some(*count),
                _ => None,
            })
            .collect();
        // Starts at one dot; ticks at 400 ms: 2, 3, wrap to 1, 2.
        assert_eq!(counts, vec![2, 3, 1, 2]);

        // The indicator disappears once the request resolves.
        collect_until(&mut events, |e| {
            matches!(e, ChatEvent::RevealFinished { .. })
        })
        .await;
        let view = handle.view().borrow().clone();
        assert!(view.loading_dots.is_none());
        assert_eq!(view.messages.last().unwrap().text, "Nous proposons...");
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_while_awaiting_is_rejected() {
        let assistant = MockAssistant::answering_after("oui", Duration::from_millis(500));
        let handle = start(assistant.clone());
        let mut events = handle.subscribe();
        handle.open().await;
        handle.submit("première").await;

        // Wait until the machine is visibly Awaiting, then try again.
        collect_until(&mut events, |e| {
            matches!(
                e,
                ChatEvent::PhaseChanged {
                    phase: Phase::Awaiting
                }
            )
        })
        .await;
        handle.submit("deuxième").await;

        collect_until(&mut events, |e| {
            matches!(e, ChatEvent::RevealFinished { .. })
        })
        .await;

        let view = handle.view().borrow().clone();
        // One user message, one answer; the second submit left no trace.
        assert_eq!(view.messages.len(), 2);
        assert_eq!(view.messages[0].text, "première");
        assert_eq!(assistant.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_appends_fixed_reply_and_returns_idle() {
        let handle = start(MockAssistant::failing(AskError::Status(500)));
        let mut events = handle.subscribe();
        handle.open().await;
        handle.submit("allo ?").await;

        let seen = collect_until(&mut events, |e| {
            matches!(e, ChatEvent::PhaseChanged { phase: Phase::Idle })
        })
        .await;
        assert!(
            !seen
                .iter()
                .any(|e| matches!(e, ChatEvent::RevealStarted { .. })),
            "no reveal may start on failure"
        );

        let view = handle.view().borrow().clone();
        assert_eq!(view.messages.len(), 2);
        assert_eq!(view.messages[1].text, "Désolé, une erreur s'est produite.");
        assert_eq!(view.phase, Phase::Idle);
        assert!(view.revealing.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_uses_its_own_reply() {
        let handle = start(MockAssistant::failing(AskError::Unreachable(
            "connexion refusée".into(),
        )));
        let mut events = handle.subscribe();
        handle.open().await;
        handle.submit("allo ?").await;

        collect_until(&mut events, |e| {
            matches!(e, ChatEvent::PhaseChanged { phase: Phase::Idle })
        })
        .await;

        let view = handle.view().borrow().clone();
        assert_eq!(
            view.messages[1].text,
            "Désolé, impossible de contacter l'assistant."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_answer_falls_back_to_default_phrase() {
        let handle = start(MockAssistant::empty_payload());
        let mut events = handle.subscribe();
        handle.open().await;
        handle.submit("hein ?").await;

        collect_until(&mut events, |e| {
            matches!(e, ChatEvent::RevealFinished { .. })
        })
        .await;

        let view = handle.view().borrow().clone();
        assert_eq!(view.messages[1].text, "Je n'ai pas compris.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_delay_precedes_typing() {
        let handle = start(MockAssistant::answering("Oui"));
        let mut events = handle.subscribe();
        handle.open().await;
        handle.submit("on y va ?").await;

        // The placeholder appears while the phase is still Awaiting.
        collect_until(&mut events, |e| {
            matches!(
                e,
                ChatEvent::MessageAppended {
                    sender: Sender::Assistant,
                    ..
                }
            )
        })
        .await;
        let view = handle.view().borrow().clone();
        assert_eq!(view.phase, Phase::Awaiting);
        assert_eq!(view.messages[1].text, "");
        assert!(view.loading_dots.is_none(), "dots stop before typing starts");

        let seen = collect_until(&mut events, |e| {
            matches!(e, ChatEvent::RevealStarted { .. })
        })
        .await;
        assert!(seen.iter().any(|e| matches!(
            e,
            ChatEvent::PhaseChanged {
                phase: Phase::Revealing
            }
        )));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_is_refused_while_revealing() {
        let handle = start(MockAssistant::answering("Une réponse assez longue."));
        let mut events = handle.subscribe();
        handle.open().await;
        handle.submit("dis-moi tout").await;

        collect_until(&mut events, |e| {
            matches!(e, ChatEvent::RevealStarted { .. })
        })
        .await;
        let view = handle.view().borrow().clone();
        assert!(view.close_disabled);

        handle.close().await;
        collect_until(&mut events, |e| {
            matches!(e, ChatEvent::RevealFinished { .. })
        })
        .await;

        // The close request was dropped: still visible, answer completed.
        let view = handle.view().borrow().clone();
        assert!(view.visible);
        assert_eq!(view.messages[1].text, "Une réponse assez longue.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_while_awaiting_orphans_the_request() {
        let assistant = MockAssistant::answering_after("trop tard", Duration::from_millis(500));
        let handle = start(assistant.clone());
        let mut events = handle.subscribe();
        handle.open().await;
        handle.submit("question").await;

        collect_until(&mut events, |e| {
            matches!(
                e,
                ChatEvent::PhaseChanged {
                    phase: Phase::Awaiting
                }
            )
        })
        .await;
        handle.close().await;
        collect_until(&mut events, |e| matches!(e, ChatEvent::PanelClosed)).await;

        // Let the orphaned resolution arrive; it must not mutate anything.
        sleep(Duration::from_secs(1)).await;
        let view = handle.view().borrow().clone();
        assert!(!view.visible);
        assert_eq!(view.phase, Phase::Idle);
        assert_eq!(view.messages.len(), 1, "late answer must be discarded");
        assert_eq!(assistant.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_log_survives_close_and_reopen() {
        let handle = start(MockAssistant::answering("Oui"));
        let mut events = handle.subscribe();
        handle.open().await;
        handle.submit("un").await;
        collect_until(&mut events, |e| {
            matches!(e, ChatEvent::RevealFinished { .. })
        })
        .await;

        handle.close().await;
        handle.open().await;
        collect_until(&mut events, |e| matches!(e, ChatEvent::PanelOpened)).await;

        let view = handle.view().borrow().clone();
        assert!(view.visible);
        assert_eq!(view.messages.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_during_reveal_plateaus_the_text() {
        let handle = start(MockAssistant::answering(
            "Une réponse vraiment interminable pour laisser le temps de couper.",
        ));
        let mut events = handle.subscribe();
        handle.open().await;
        handle.submit("vas-y").await;

        // Let a few characters land, then pull the plug.
        let mut progressed = 0;
        while progressed < 3 {
            if let ChatEvent::RevealProgress { .. } = events.recv().await.unwrap() {
                progressed += 1;
            }
        }
        handle.shutdown().await;

        collect_until(&mut events, |e| {
            matches!(e, ChatEvent::PhaseChanged { phase: Phase::Idle })
        })
        .await;
        let frozen = handle.view().borrow().messages[1].text.clone();
        assert!(!frozen.is_empty());
        assert!(frozen.len() < "Une réponse vraiment interminable".len());

        // No tick may land after teardown.
        advance(Duration::from_secs(2)).await;
        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
        assert_eq!(handle.view().borrow().messages[1].text, frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_greeting_seeds_the_log() {
        let (handle, engine) =
            ChatEngine::new(MockAssistant::answering("x"), ChatConfig::default());
        tokio::spawn(engine.run());

        let view = handle.view().borrow().clone();
        assert_eq!(view.messages.len(), 1);
        assert_eq!(view.messages[0].sender, Sender::Assistant);
        assert!(view.messages[0].text.starts_with("Bonjour"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_keyboard_visibility_toggles_suggestions() {
        let handle = start(MockAssistant::answering("x"));
        let mut view = handle.view();
        assert!(view.borrow().suggestions_visible);

        handle.set_keyboard_visible(true).await;
        view.changed().await.unwrap();
        assert!(!view.borrow().suggestions_visible);

        handle.set_keyboard_visible(false).await;
        view.changed().await.unwrap();
        assert!(view.borrow().suggestions_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_character_answer_completes() {
        let handle = start(MockAssistant::answering("k"));
        let mut events = handle.subscribe();
        handle.open().await;
        handle.submit("ok ?").await;

        collect_until(&mut events, |e| {
            matches!(e, ChatEvent::RevealFinished { .. })
        })
        .await;
        let view = handle.view().borrow().clone();
        assert_eq!(view.messages[1].text, "k");
        assert_eq!(view.phase, Phase::Idle);
    }
}

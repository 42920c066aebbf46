//! TUI wiring: the radio screen and the assistant panel overlay

use std::time::{Duration, Instant};

use crossterm::event::EventStream;
use futures::StreamExt;
use onde_chat::{PanelHandle, PanelView, Sender, Ticker};
use onde_tui::{
    TerminalSession, Theme,
    input::{Action, event_to_action},
    widgets::{
        Bubble, InputBox, MessageList, Speaker, SuggestionBar, Waveform, message_list_height,
        suggestions::SUGGESTION_BAR_HEIGHT,
    },
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use tokio::sync::mpsc;

use crate::news::{self, Headline};
use crate::player::{PlaybackState, Player};

/// Suggested questions, shown while the user is not composing.
const SUGGESTIONS: &[&str] = &["Comment tu peux m'aider ?", "Quels sont vos services ?"];

/// Messages from the app's own timers
enum AppMsg {
    RotateHeadline,
}

/// Application UI state
struct AppUi {
    theme: Theme,
    input: InputBox,
    /// Scroll offset from the bottom of the conversation, in lines
    scroll_offset: usize,
    headlines: Vec<Headline>,
    headline_idx: usize,
    suggestion_idx: Option<usize>,
    /// Whether the user is composing; mirrors what the engine was last told
    composing: bool,
    /// Waveform clock
    started: Instant,
}

impl AppUi {
    fn new(theme: Theme, headlines: Vec<Headline>) -> Self {
        Self {
            theme,
            input: InputBox::new().with_placeholder("Entrez votre message..."),
            scroll_offset: 0,
            headlines,
            headline_idx: 0,
            suggestion_idx: None,
            composing: false,
            started: Instant::now(),
        }
    }

    fn rotate_headline(&mut self) {
        if !self.headlines.is_empty() {
            self.headline_idx = (self.headline_idx + 1) % self.headlines.len();
        }
    }

    fn previous_headline(&mut self) {
        if !self.headlines.is_empty() {
            let len = self.headlines.len();
            self.headline_idx = (self.headline_idx + len - 1) % len;
        }
    }

    /// Keep widget-side gating in step with the engine's view.
    fn sync(&mut self, view: &PanelView) {
        self.input.set_enabled(view.input_enabled);
    }

    /// Tell the engine when composing starts or stops (the terminal's
    /// keyboard-visibility analog). Filling the input from a suggestion chip
    /// deliberately does not count.
    async fn sync_composing(&mut self, chat: &PanelHandle) {
        let composing = !self.input.is_empty();
        if composing != self.composing {
            self.composing = composing;
            chat.set_keyboard_visible(composing).await;
        }
    }

    /// Handle one action. Returns false to quit.
    async fn handle_action(
        &mut self,
        action: Action,
        width: u16,
        view: &PanelView,
        chat: &PanelHandle,
        player: &mut Player,
    ) -> anyhow::Result<bool> {
        if view.visible {
            self.handle_panel_action(action, width, view, chat).await
        } else {
            self.handle_radio_action(action, chat, player).await
        }
    }

    async fn handle_radio_action(
        &mut self,
        action: Action,
        chat: &PanelHandle,
        player: &mut Player,
    ) -> anyhow::Result<bool> {
        match action {
            Action::Char(' ') | Action::Char('p') => player.toggle()?,
            Action::Char('a') | Action::Submit => chat.open().await,
            Action::Left => self.previous_headline(),
            Action::Right => self.rotate_headline(),
            Action::Char('q') | Action::Quit | Action::Interrupt | Action::Escape => {
                return Ok(false);
            }
            _ => {}
        }
        Ok(true)
    }

    async fn handle_panel_action(
        &mut self,
        action: Action,
        width: u16,
        view: &PanelView,
        chat: &PanelHandle,
    ) -> anyhow::Result<bool> {
        match action {
            Action::Escape => {
                // Mirrors the disabled close affordance: while revealing the
                // request is not even sent.
                if !view.close_disabled {
                    chat.close().await;
                }
            }
            Action::Quit | Action::Interrupt => return Ok(false),
            Action::Submit => {
                let text = self.input.content().to_string();
                if view.input_enabled && !text.trim().is_empty() {
                    chat.submit(text).await;
                    self.input.clear();
                    self.suggestion_idx = None;
                    self.scroll_offset = 0;
                    self.sync_composing(chat).await;
                }
            }
            Action::Tab | Action::BackTab => {
                if view.suggestions_visible && view.input_enabled && !SUGGESTIONS.is_empty() {
                    let len = SUGGESTIONS.len();
                    let next = match (&action, self.suggestion_idx) {
                        (Action::BackTab, Some(i)) => (i + len - 1) % len,
                        (Action::BackTab, None) => len - 1,
                        (_, Some(i)) => (i + 1) % len,
                        (_, None) => 0,
                    };
                    self.suggestion_idx = Some(next);
                    self.input.set_content(SUGGESTIONS[next]);
                }
            }
            Action::PageUp => self.scroll_offset = self.scroll_offset.saturating_add(5),
            Action::PageDown => self.scroll_offset = self.scroll_offset.saturating_sub(5),
            other => {
                if self.input.handle_action(&other, width) {
                    self.suggestion_idx = None;
                    self.sync_composing(chat).await;
                }
            }
        }
        Ok(true)
    }

    fn render(&mut self, frame: &mut Frame, view: &PanelView, playback: PlaybackState) {
        let area = frame.area();
        self.render_radio(frame, area, playback);
        if view.visible {
            self.render_panel(frame, area, view);
        }
    }

    fn render_radio(&self, frame: &mut Frame, area: Rect, playback: PlaybackState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Min(4),    // Waveform
                Constraint::Length(1), // Key hints
                Constraint::Length(1), // Headline
            ])
            .split(area);

        let title = Line::from(vec![
            Span::styled("ONDE", self.theme.accent_bold()),
            Span::styled(format!("  {}", playback.label()), self.theme.dim_style()),
        ]);
        Paragraph::new(title).render(chunks[0], frame.buffer_mut());

        if playback == PlaybackState::Playing {
            Waveform::new(&self.theme, self.started.elapsed())
                .render(chunks[1], frame.buffer_mut());
        } else {
            let hint = match playback {
                PlaybackState::Connecting => "connexion au direct…",
                PlaybackState::Paused => "en pause — espace pour reprendre",
                _ => "espace pour écouter le direct",
            };
            Paragraph::new(Line::from(Span::styled(hint, self.theme.dim_style())))
                .centered()
                .render(chunks[1], frame.buffer_mut());
        }

        Paragraph::new(Line::from(Span::styled(
            "[espace] lecture · [a] assistant · [←/→] actus · [q] quitter",
            self.theme.dim_style(),
        )))
        .render(chunks[2], frame.buffer_mut());

        if let Some(headline) = self.headlines.get(self.headline_idx) {
            Paragraph::new(Line::from(vec![
                Span::styled("À la une : ", self.theme.accent_style()),
                Span::styled(headline.title.clone(), self.theme.base_style()),
            ]))
            .render(chunks[3], frame.buffer_mut());
        }
    }

    fn render_panel(&mut self, frame: &mut Frame, area: Rect, view: &PanelView) {
        let panel = centered_rect(
            area,
            area.width.saturating_sub(6).clamp(30, 76),
            area.height.saturating_sub(2).clamp(12, 28),
        );
        Clear.render(panel, frame.buffer_mut());

        let title = if view.close_disabled {
            " Assistant — réponse en cours… "
        } else {
            " Assistant — Échap pour fermer "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.accent_style())
            .title(Span::styled(title, self.theme.accent_bold()));
        let inner = block.inner(panel);
        block.render(panel, frame.buffer_mut());

        let mut constraints = vec![Constraint::Min(3)];
        if view.suggestions_visible {
            constraints.push(Constraint::Length(SUGGESTION_BAR_HEIGHT));
        }
        constraints.push(Constraint::Length(3));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        let bubbles = panel_bubbles(view);
        let messages_area = chunks[0];
        let total = message_list_height(
            &bubbles,
            view.loading_dots.is_some(),
            messages_area.width as usize,
        );
        let max_start = total.saturating_sub(messages_area.height as usize);
        self.scroll_offset = self.scroll_offset.min(max_start);
        let start = max_start - self.scroll_offset;

        let mut list = MessageList::new(&bubbles, &self.theme).scroll(start);
        if let Some(dots) = &view.loading_dots {
            list = list.loading(dots);
        }
        list.render(messages_area, frame.buffer_mut());

        if view.suggestions_visible {
            SuggestionBar::new(SUGGESTIONS, &self.theme)
                .selected(self.suggestion_idx)
                .render(chunks[1], frame.buffer_mut());
        }

        let input_area = chunks[chunks.len() - 1];
        self.input.render(input_area, frame.buffer_mut(), &self.theme);
    }
}

fn panel_bubbles(view: &PanelView) -> Vec<Bubble> {
    view.messages
        .iter()
        .map(|message| Bubble {
            speaker: match message.sender {
                Sender::User => Speaker::User,
                Sender::Assistant => Speaker::Assistant,
            },
            text: message.text.clone(),
            revealing: view.revealing == Some(message.id),
        })
        .collect()
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn start_carousel(carousel: &mut Ticker, tx: mpsc::Sender<AppMsg>) {
    carousel.start(news::ROTATE_PERIOD, move || {
        let _ = tx.try_send(AppMsg::RotateHeadline);
    });
}

/// Run the application until the user quits.
pub async fn run_app(
    chat: PanelHandle,
    player: &mut Player,
    headlines: Vec<Headline>,
    theme: Theme,
) -> anyhow::Result<()> {
    let mut session = TerminalSession::new()?;
    let mut view_rx = chat.view();
    let mut events = EventStream::new();
    let (app_tx, mut app_rx) = mpsc::channel::<AppMsg>(8);

    let mut ui = AppUi::new(theme, headlines);
    let mut carousel = Ticker::new();
    if !ui.headlines.is_empty() {
        start_carousel(&mut carousel, app_tx.clone());
    }
    let mut panel_was_visible = false;

    // Repaint cadence for the waveform and the typing cursor
    let mut tick = tokio::time::interval(Duration::from_millis(80));

    loop {
        let view = view_rx.borrow_and_update().clone();

        // The carousel is an interaction-suppressible timer: rotation pauses
        // while the panel is up and resumes when it goes away.
        if view.visible != panel_was_visible {
            if view.visible {
                carousel.stop();
            } else if !ui.headlines.is_empty() {
                start_carousel(&mut carousel, app_tx.clone());
            }
            panel_was_visible = view.visible;
        }

        ui.sync(&view);
        let playback = player.state();
        session
            .terminal_mut()
            .draw(|frame| ui.render(frame, &view, playback))?;
        let width = session.terminal_mut().size()?.width;

        tokio::select! {
            biased;

            changed = view_rx.changed() => {
                if changed.is_err() {
                    break; // engine gone
                }
            }

            event = events.next() => {
                match event {
                    Some(Ok(event)) => {
                        if let Some(action) = event_to_action(event) {
                            if !ui.handle_action(action, width, &view, &chat, player).await? {
                                break;
                            }
                        }
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }

            msg = app_rx.recv() => {
                if let Some(AppMsg::RotateHeadline) = msg {
                    ui.rotate_headline();
                }
            }

            _ = tick.tick() => {}
        }
    }

    Ok(())
}

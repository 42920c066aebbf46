//! Chat bubble list for the assistant panel

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use textwrap;

/// Who a bubble belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// One rendered conversation entry
#[derive(Debug, Clone)]
pub struct Bubble {
    pub speaker: Speaker,
    pub text: String,
    /// Whether the answer is still typing into this bubble
    pub revealing: bool,
}

impl Bubble {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            revealing: false,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
            revealing: false,
        }
    }
}

/// Widget rendering the conversation, a trailing cursor on the revealing
/// bubble, and the loading ellipsis bubble while a request is outstanding.
pub struct MessageList<'a> {
    bubbles: &'a [Bubble],
    theme: &'a Theme,
    /// Loading ellipsis to append as its own bubble, when present
    loading_dots: Option<&'a str>,
    scroll: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(bubbles: &'a [Bubble], theme: &'a Theme) -> Self {
        Self {
            bubbles,
            theme,
            loading_dots: None,
            scroll: 0,
        }
    }

    /// Show a loading bubble with the given ellipsis after the messages.
    pub fn loading(mut self, dots: &'a str) -> Self {
        self.loading_dots = Some(dots);
        self
    }

    /// Set scroll offset in lines
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    fn bubble_lines(&self, bubble: &Bubble, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        let (label, style, prefix) = match bubble.speaker {
            Speaker::User => ("Vous", self.theme.accent_bold(), "▶ "),
            Speaker::Assistant => ("Assistant", self.theme.base_style(), "◀ "),
        };
        lines.push(Line::from(Span::styled(format!("{prefix}{label}"), style)));

        let content_width = width.saturating_sub(2).max(1);
        // wrap() yields one empty line for empty text, so a still-empty
        // revealing bubble keeps a line for its cursor.
        let wrapped = textwrap::wrap(&bubble.text, content_width);
        let count = wrapped.len();
        for (i, part) in wrapped.into_iter().enumerate() {
            let mut spans = vec![Span::styled(
                format!("  {part}"),
                self.theme.base_style(),
            )];
            if bubble.revealing && i + 1 == count {
                spans.push(Span::styled("▌", self.theme.accent_style()));
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::from(""));
        lines
    }

    fn all_lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines: Vec<Line> = Vec::new();
        for bubble in self.bubbles {
            lines.extend(self.bubble_lines(bubble, width));
        }
        if let Some(dots) = self.loading_dots {
            lines.push(Line::from(Span::styled(
                "◀ Assistant",
                self.theme.base_style(),
            )));
            lines.push(Line::from(Span::styled(
                format!("  {dots}"),
                self.theme.accent_bold(),
            )));
            lines.push(Line::from(""));
        }
        lines
    }
}

impl Widget for MessageList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let visible: Vec<Line> = self
            .all_lines(area.width as usize)
            .into_iter()
            .skip(self.scroll)
            .take(area.height as usize)
            .collect();
        Paragraph::new(visible).render(area, buf);
    }
}

/// Total line count the list would occupy at the given width, for scroll
/// clamping. Must stay in step with the render logic above.
pub fn message_list_height(bubbles: &[Bubble], loading: bool, width: usize) -> usize {
    let content_width = width.saturating_sub(2).max(1);
    let mut total = 0;
    for bubble in bubbles {
        let wrapped = textwrap::wrap(&bubble.text, content_width).len();
        total += 1 + wrapped + 1;
    }
    if loading {
        total += 3;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_counts_header_body_and_gap() {
        let bubbles = vec![Bubble::user("salut"), Bubble::assistant("bonjour")];
        assert_eq!(message_list_height(&bubbles, false, 40), 6);
    }

    #[test]
    fn test_height_includes_loading_bubble() {
        let bubbles = vec![Bubble::user("salut")];
        assert_eq!(message_list_height(&bubbles, true, 40), 6);
    }

    #[test]
    fn test_height_wraps_long_text() {
        let bubbles = vec![Bubble::assistant("a".repeat(30))];
        // 30 chars at content width 10 wrap to 3 lines.
        assert_eq!(message_list_height(&bubbles, false, 12), 5);
    }

    #[test]
    fn test_empty_revealing_bubble_still_takes_a_line() {
        let mut bubble = Bubble::assistant("");
        bubble.revealing = true;
        assert_eq!(message_list_height(&[bubble], false, 40), 3);
    }
}

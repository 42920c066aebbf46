//! Text input widget for the panel

use crate::input::Action;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

/// Single-line text input with a cursor and horizontal scrolling.
///
/// When disabled (the panel is busy) edits are refused and the widget renders
/// dimmed, mirroring the engine's input gate.
#[derive(Debug, Default)]
pub struct InputBox {
    content: String,
    /// Cursor position as a character index
    cursor: usize,
    /// Horizontal scroll offset in display columns
    scroll: usize,
    placeholder: String,
    enabled: bool,
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.cursor = self.content.chars().count();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    fn cursor_column(&self) -> usize {
        self.content
            .chars()
            .take(self.cursor)
            .map(|c| c.width().unwrap_or(0))
            .sum()
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    fn remove_char_at(&mut self, char_index: usize) {
        let start = self.byte_offset(char_index);
        let end = self.byte_offset(char_index + 1);
        self.content.drain(start..end);
    }

    /// Apply an editing action. Returns true when the content or cursor
    /// changed. All edits are refused while disabled.
    pub fn handle_action(&mut self, action: &Action, width: u16) -> bool {
        if !self.enabled {
            return false;
        }
        let char_count = self.content.chars().count();
        let changed = match action {
            Action::Char(c) => {
                self.insert_char(*c);
                true
            }
            Action::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.remove_char_at(self.cursor);
                    true
                } else {
                    false
                }
            }
            Action::Delete => {
                if self.cursor < char_count {
                    self.remove_char_at(self.cursor);
                    true
                } else {
                    false
                }
            }
            Action::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    true
                } else {
                    false
                }
            }
            Action::Right => {
                if self.cursor < char_count {
                    self.cursor += 1;
                    true
                } else {
                    false
                }
            }
            Action::Home => {
                self.cursor = 0;
                true
            }
            Action::End => {
                self.cursor = char_count;
                true
            }
            Action::ClearLine => {
                self.clear();
                true
            }
            Action::Paste(text) => {
                for c in text.chars() {
                    // Single-line input: fold newlines into spaces.
                    if c == '\n' || c == '\r' {
                        if !self.content.ends_with(' ') && self.cursor > 0 {
                            self.insert_char(' ');
                        }
                    } else {
                        self.insert_char(c);
                    }
                }
                true
            }
            _ => false,
        };
        if changed {
            self.update_scroll(width as usize);
        }
        changed
    }

    fn update_scroll(&mut self, width: usize) {
        let visible = width.saturating_sub(4).max(1);
        let column = self.cursor_column();
        if column < self.scroll {
            self.scroll = column;
        } else if column >= self.scroll + visible {
            self.scroll = column - visible + 1;
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if self.enabled {
                theme.accent_style()
            } else {
                theme.border_style()
            });
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let (text, style) = if self.content.is_empty() {
            (self.placeholder.clone(), theme.dim_style())
        } else {
            let visible_width = inner.width as usize;
            let mut shown = String::new();
            let mut skipped = 0;
            let mut taken = 0;
            for c in self.content.chars() {
                let w = c.width().unwrap_or(0);
                if skipped < self.scroll {
                    skipped += w;
                    continue;
                }
                if taken + w > visible_width {
                    break;
                }
                shown.push(c);
                taken += w;
            }
            let style = if self.enabled {
                theme.base_style()
            } else {
                theme.dim_style()
            };
            (shown, style)
        };
        Paragraph::new(text).style(style).render(inner, buf);

        if self.enabled {
            let cursor_x = self.cursor_column().saturating_sub(self.scroll);
            if cursor_x < inner.width as usize {
                let x = inner.x + cursor_x as u16;
                if let Some(cell) = buf.cell_mut((x, inner.y)) {
                    cell.set_style(Style::default().bg(theme.accent));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_and_cursor_movement() {
        let mut input = InputBox::new();
        for c in "ondé".chars() {
            input.handle_action(&Action::Char(c), 80);
        }
        assert_eq!(input.content(), "ondé");

        input.handle_action(&Action::Left, 80);
        input.handle_action(&Action::Backspace, 80);
        assert_eq!(input.content(), "oné");
    }

    #[test]
    fn test_delete_at_cursor() {
        let mut input = InputBox::new();
        input.set_content("abc");
        input.handle_action(&Action::Home, 80);
        input.handle_action(&Action::Delete, 80);
        assert_eq!(input.content(), "bc");
    }

    #[test]
    fn test_edits_refused_while_disabled() {
        let mut input = InputBox::new();
        input.set_content("figé");
        input.set_enabled(false);
        assert!(!input.handle_action(&Action::Char('x'), 80));
        assert!(!input.handle_action(&Action::Backspace, 80));
        assert_eq!(input.content(), "figé");
    }

    #[test]
    fn test_paste_folds_newlines() {
        let mut input = InputBox::new();
        input.set_content("a");
        input.handle_action(&Action::Paste("b\nc".to_string()), 80);
        assert_eq!(input.content(), "ab c");
    }

    #[test]
    fn test_clear_line() {
        let mut input = InputBox::new();
        input.set_content("quelque chose");
        input.handle_action(&Action::ClearLine, 80);
        assert!(input.is_empty());
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut input = InputBox::new();
        input.set_content("x");
        input.handle_action(&Action::Home, 80);
        assert!(!input.handle_action(&Action::Backspace, 80));
        assert_eq!(input.content(), "x");
    }
}

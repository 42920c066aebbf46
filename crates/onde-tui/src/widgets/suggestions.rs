//! Suggested-questions row shown under the conversation

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Two lines: a label and a row of question chips. Tab cycles through the
/// chips; the highlighted one is rendered in the accent color.
pub struct SuggestionBar<'a> {
    items: &'a [&'a str],
    selected: Option<usize>,
    theme: &'a Theme,
}

/// Lines the bar occupies.
pub const SUGGESTION_BAR_HEIGHT: u16 = 2;

impl<'a> SuggestionBar<'a> {
    pub fn new(items: &'a [&'a str], theme: &'a Theme) -> Self {
        Self {
            items,
            selected: None,
            theme,
        }
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for SuggestionBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < SUGGESTION_BAR_HEIGHT || self.items.is_empty() {
            return;
        }

        let label = Line::from(Span::styled(
            "Questions fréquentes",
            self.theme.dim_style(),
        ));

        let mut chips: Vec<Span> = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            let style = if self.selected == Some(i) {
                self.theme.accent_bold()
            } else {
                self.theme.base_style()
            };
            chips.push(Span::styled(format!("[ {item} ]"), style));
            chips.push(Span::raw(" "));
        }

        Paragraph::new(vec![label, Line::from(chips)]).render(area, buf);
    }
}

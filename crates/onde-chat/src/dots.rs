//! Loading indicator: the cycling "thinking" ellipsis

use std::time::Duration;

use crate::ticker::Ticker;

/// Period of the dot cycle.
pub const DOT_PERIOD: Duration = Duration::from_millis(400);

/// The ellipsis wraps back to one dot after this many.
pub const MAX_DOTS: u8 = 3;

/// State of the ellipsis shown while a request is outstanding: one to three
/// dots, advancing on each tick of its own driver. Stopping resets to a
/// single dot so the next awaiting phase starts clean.
#[derive(Debug, Default)]
pub struct Dots {
    count: u8,
    ticker: Ticker,
}

impl Dots {
    pub fn new() -> Self {
        Self {
            count: 1,
            ticker: Ticker::new(),
        }
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    /// The rendered ellipsis, e.g. `".."`.
    pub fn text(&self) -> String {
        ".".repeat(self.count as usize)
    }

    /// Whether the indicator is actively cycling.
    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }

    /// Advance one step: 1 → 2 → 3 → 1. Returns the new count.
    pub(crate) fn advance(&mut self) -> u8 {
        self.count = if self.count < MAX_DOTS { self.count + 1 } else { 1 };
        self.count
    }

    /// Reset to a single dot and start the driver.
    pub(crate) fn start<F>(&mut self, period: Duration, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.count = 1;
        self.ticker.start(period, callback);
    }

    /// Stop the driver and reset to a single dot.
    pub(crate) fn stop(&mut self) {
        self.ticker.stop();
        self.count = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_wraps_after_three() {
        let mut dots = Dots::new();
        assert_eq!(dots.count(), 1);
        assert_eq!(dots.advance(), 2);
        assert_eq!(dots.advance(), 3);
        assert_eq!(dots.advance(), 1);
        assert_eq!(dots.advance(), 2);
    }

    #[test]
    fn test_text_matches_count() {
        let mut dots = Dots::new();
        assert_eq!(dots.text(), ".");
        dots.advance();
        dots.advance();
        assert_eq!(dots.text(), "...");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_resets_to_one_dot() {
        let mut dots = Dots::new();
        dots.start(Duration::from_millis(10), || {});
        dots.advance();
        dots.advance();
        dots.stop();
        assert_eq!(dots.count(), 1);
    }
}

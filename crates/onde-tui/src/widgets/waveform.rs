//! Animated waveform for the radio screen

use std::time::Duration;

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{
        Widget,
        canvas::{Canvas, Line},
    },
};

/// Per-wave shape parameters: frequency (half-turns across the width),
/// relative amplitude, initial phase, vertical offset.
const WAVE_FREQUENCIES: [f64; 3] = [2.0, 2.5, 1.5];
const WAVE_AMPLITUDES: [f64; 3] = [0.60, 0.50, 0.70];
const WAVE_PHASES: [f64; 3] = [0.0, std::f64::consts::PI / 3.0, std::f64::consts::PI * 0.8];
const WAVE_Y_OFFSETS: [f64; 3] = [0.0, 0.10, -0.10];

/// Amplitude breathes between 60% and 100% over this half-cycle.
const BREATH_HALF_CYCLE: Duration = Duration::from_millis(1800);
/// One full phase slide (2π) takes this long.
const SLIDE_CYCLE: Duration = Duration::from_millis(8000);

/// Steps per wave; more steps, smoother curve.
const RESOLUTION: usize = 120;

/// Three overlapping sine waves, breathing and sliding with time. Stateless:
/// the frame is a pure function of the elapsed time handed in, so the widget
/// needs no timer of its own and simply is not drawn while playback is
/// stopped.
pub struct Waveform<'a> {
    theme: &'a Theme,
    elapsed: Duration,
}

impl<'a> Waveform<'a> {
    pub fn new(theme: &'a Theme, elapsed: Duration) -> Self {
        Self { theme, elapsed }
    }

    /// Breathing factor in [0.6, 1.0] with ease-in-out at both ends.
    fn breath(&self) -> f64 {
        let half = BREATH_HALF_CYCLE.as_secs_f64();
        let t = self.elapsed.as_secs_f64() % (2.0 * half);
        // Triangle position in [0, 1], then smoothstep.
        let tri = if t < half { t / half } else { 2.0 - t / half };
        let eased = tri * tri * (3.0 - 2.0 * tri);
        1.0 - 0.4 * eased
    }

    fn slide(&self) -> f64 {
        let cycle = SLIDE_CYCLE.as_secs_f64();
        (self.elapsed.as_secs_f64() % cycle) / cycle * std::f64::consts::TAU
    }
}

impl Widget for Waveform<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 2 {
            return;
        }
        let breath = self.breath();
        let slide = self.slide();
        let color = self.theme.accent;

        Canvas::default()
            .x_bounds([0.0, 1.0])
            .y_bounds([-1.0, 1.0])
            .paint(|ctx| {
                for wave in 0..WAVE_FREQUENCIES.len() {
                    let frequency = WAVE_FREQUENCIES[wave];
                    let amplitude = WAVE_AMPLITUDES[wave] * breath;
                    let phase = WAVE_PHASES[wave] + slide;
                    let y_offset = WAVE_Y_OFFSETS[wave];

                    let point = |i: usize| {
                        let x = i as f64 / RESOLUTION as f64;
                        let angle = x * frequency * std::f64::consts::PI + phase;
                        (x, angle.sin() * amplitude + y_offset)
                    };

                    let mut previous = point(0);
                    for i in 1..=RESOLUTION {
                        let current = point(i);
                        ctx.draw(&Line {
                            x1: previous.0,
                            y1: previous.1,
                            x2: current.0,
                            y2: current.1,
                            color,
                        });
                        previous = current;
                    }
                }
            })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breath_stays_in_range() {
        let theme = Theme::dark();
        for ms in (0..10_000).step_by(100) {
            let wave = Waveform::new(&theme, Duration::from_millis(ms));
            let b = wave.breath();
            assert!((0.6..=1.0).contains(&b), "breath {b} out of range at {ms}ms");
        }
    }

    #[test]
    fn test_breath_is_full_at_cycle_start() {
        let theme = Theme::dark();
        let wave = Waveform::new(&theme, Duration::ZERO);
        assert!((wave.breath() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_slide_wraps_every_cycle() {
        let theme = Theme::dark();
        let a = Waveform::new(&theme, Duration::from_millis(500)).slide();
        let b = Waveform::new(&theme, Duration::from_millis(8500)).slide();
        assert!((a - b).abs() < 1e-9);
    }
}

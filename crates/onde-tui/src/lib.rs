//! onde-tui: Terminal UI components
//!
//! Widgets and terminal plumbing for the radio screen and the assistant
//! panel, built on ratatui and crossterm.

pub mod app;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::TerminalSession;
pub use theme::Theme;

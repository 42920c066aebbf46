//! UI widgets

pub mod input_box;
pub mod message_list;
pub mod suggestions;
pub mod waveform;

pub use input_box::InputBox;
pub use message_list::{Bubble, MessageList, Speaker, message_list_height};
pub use suggestions::SuggestionBar;
pub use waveform::Waveform;

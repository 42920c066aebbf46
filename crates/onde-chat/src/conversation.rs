//! Conversation log: an append-only, ordered sequence of messages

use serde::{Deserialize, Serialize};

/// Strictly increasing message identifier, unique within a conversation.
pub type MessageId = u64;

/// Who said it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

/// One entry in the conversation log.
///
/// `text` is the displayed text: final at creation for a user message, and a
/// growing prefix of the full answer for an assistant message under reveal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    /// Creation time, unix milliseconds
    pub timestamp: i64,
}

/// Append-only message log. Insertion order is display order; messages are
/// never removed or reordered, and only the text of an assistant message may
/// be rewritten (by the reveal).
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    next_id: MessageId,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, returning its id.
    pub(crate) fn push(&mut self, sender: Sender, text: impl Into<String>) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message {
            id,
            sender,
            text: text.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        });
        id
    }

    /// Rewrite the text of an assistant message. Returns `false` when the id
    /// is unknown or names a user message (user text is immutable).
    pub(crate) fn set_text(&mut self, id: MessageId, text: &str) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) if message.sender == Sender::Assistant => {
                message.text = text.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let mut log = Conversation::new();
        let a = log.push(Sender::User, "un");
        let b = log.push(Sender::Assistant, "deux");
        let c = log.push(Sender::User, "trois");
        assert!(a < b && b < c);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_user_text_is_immutable() {
        let mut log = Conversation::new();
        let id = log.push(Sender::User, "ma question");
        assert!(!log.set_text(id, "autre chose"));
        assert_eq!(log.get(id).unwrap().text, "ma question");
    }

    #[test]
    fn test_assistant_text_is_rewritable() {
        let mut log = Conversation::new();
        let id = log.push(Sender::Assistant, "");
        assert!(log.set_text(id, "Bon"));
        assert!(log.set_text(id, "Bonjour"));
        assert_eq!(log.get(id).unwrap().text, "Bonjour");
    }

    #[test]
    fn test_unknown_id_is_rejected() {
        let mut log = Conversation::new();
        assert!(!log.set_text(42, "rien"));
    }
}

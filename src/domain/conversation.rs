//! Conversation history entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hard cap on stored exchanges per conversation.
pub const MAX_EXCHANGES: usize = 50;

/// Number of most recent exchanges retained once the cap is exceeded.
pub const RETAINED_EXCHANGES: usize = 30;

/// A single user/assistant exchange. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    user_text: String,
    assistant_text: String,
    timestamp: DateTime<Utc>,
}

impl Exchange {
    pub fn new(user_text: impl Into<String>, assistant_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            assistant_text: assistant_text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    pub fn assistant_text(&self) -> &str {
        &self.assistant_text
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// An ordered, bounded sequence of exchanges for one conversation id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    id: String,
    exchanges: Vec<Exchange>,
}

impl Conversation {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            exchanges: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    /// Append an exchange, applying the cap-then-trim policy: once the
    /// length exceeds [`MAX_EXCHANGES`], only the [`RETAINED_EXCHANGES`]
    /// most recent entries are kept.
    pub fn push(&mut self, exchange: Exchange) {
        self.exchanges.push(exchange);

        if self.exchanges.len() > MAX_EXCHANGES {
            let cut = self.exchanges.len() - RETAINED_EXCHANGES;
            self.exchanges.drain(..cut);
        }
    }

    /// The last `n` exchanges in chronological order, oldest first.
    pub fn window(&self, n: usize) -> &[Exchange] {
        let start = self.exchanges.len().saturating_sub(n);
        &self.exchanges[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize) -> Conversation {
        let mut conversation = Conversation::new("conv-1");
        for i in 0..n {
            conversation.push(Exchange::new(format!("q{}", i), format!("a{}", i)));
        }
        conversation
    }

    #[test]
    fn test_push_below_cap_keeps_everything() {
        let conversation = filled(50);
        assert_eq!(conversation.len(), 50);
        assert_eq!(conversation.exchanges()[0].user_text(), "q0");
    }

    #[test]
    fn test_trim_after_cap_exceeded() {
        // The 51st append trips the cap and trims down to the 30 newest.
        let conversation = filled(51);

        assert_eq!(conversation.len(), 30);
        assert_eq!(conversation.exchanges()[0].user_text(), "q21");
        assert_eq!(conversation.exchanges()[29].user_text(), "q50");
    }

    #[test]
    fn test_trim_is_repeatable() {
        let conversation = filled(120);

        // Grows back to 50 between trims, never beyond.
        assert!(conversation.len() <= MAX_EXCHANGES);
        assert_eq!(
            conversation.exchanges().last().unwrap().user_text(),
            "q119"
        );
    }

    #[test]
    fn test_window_chronological_oldest_first() {
        let conversation = filled(5);
        let window = conversation.window(3);

        assert_eq!(window.len(), 3);
        assert_eq!(window[0].user_text(), "q2");
        assert_eq!(window[2].user_text(), "q4");
    }

    #[test]
    fn test_window_larger_than_history() {
        let conversation = filled(2);
        assert_eq!(conversation.window(10).len(), 2);
    }

    #[test]
    fn test_window_of_empty_conversation() {
        let conversation = Conversation::new("empty");
        assert!(conversation.window(10).is_empty());
    }
}

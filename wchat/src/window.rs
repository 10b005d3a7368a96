//! Bounded recent-history window applied before transmission.
//!
//! ```rust
//! use wchat::HistoryWindow;
//! use wprovider::Message;
//!
//! let history = (0..20)
//!     .map(|turn| Message::assistant(format!("reply {turn}")))
//!     .chain([Message::user("plan 3 days in Chengdu")])
//!     .collect::<Vec<_>>();
//!
//! let sent = HistoryWindow::default().apply(&history);
//! assert_eq!(sent.len(), 11);
//! assert_eq!(sent[0].content, "reply 10");
//! assert_eq!(sent[10].content, "plan 3 days in Chengdu");
//! ```

use wprovider::{Message, Role};

pub const DEFAULT_MAX_RECENT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    pub max_recent: usize,
}

impl HistoryWindow {
    pub fn new(max_recent: usize) -> Self {
        Self { max_recent }
    }

    /// Keeps the last `max_recent` messages before the newest user message,
    /// then that message. Anything after it is not sent. Order is preserved.
    pub fn apply(&self, messages: &[Message]) -> Vec<Message> {
        let Some(newest_user) = messages.iter().rposition(|message| message.role == Role::User)
        else {
            let start = messages.len().saturating_sub(self.max_recent);
            return messages[start..].to_vec();
        };

        let start = newest_user.saturating_sub(self.max_recent);
        messages[start..=newest_user].to_vec()
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECENT)
    }
}

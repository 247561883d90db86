//! Combat message log
//!
//! Stands in for chat and action-bar output; the host's UI drains it.

use std::collections::VecDeque;

/// Where a message is shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageChannel {
    Chat,
    ActionBar,
}

/// One logged message
#[derive(Debug, Clone)]
pub struct GameMessage {
    pub text: String,
    pub channel: MessageChannel,
    /// World tick at which the message was emitted
    pub tick: u64,
}

/// Bounded message log
#[derive(Debug)]
pub struct CombatLog {
    entries: VecDeque<GameMessage>,
    capacity: usize,
}

impl Default for CombatLog {
    fn default() -> Self {
        Self::new(256)
    }
}

impl CombatLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, text: impl Into<String>, channel: MessageChannel, tick: u64) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(GameMessage {
            text: text.into(),
            channel,
            tick,
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &GameMessage> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent message, if any.
    pub fn last(&self) -> Option<&GameMessage> {
        self.entries.back()
    }

    /// True if any entry contains the given fragment. Handy in tests.
    pub fn contains(&self, fragment: &str) -> bool {
        self.entries.iter().any(|m| m.text.contains(fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_bounded() {
        let mut log = CombatLog::new(3);
        for i in 0..5 {
            log.push(format!("msg {}", i), MessageChannel::Chat, i);
        }
        assert_eq!(log.len(), 3);
        assert!(!log.contains("msg 0"));
        assert!(log.contains("msg 4"));
    }
}

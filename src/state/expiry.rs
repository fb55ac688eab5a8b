/// Expiry of stories older than the TTL
///
/// The sweep itself is a pure filter; the store applies it at load time
/// and on every sweeper tick.

use std::time::Duration;

use super::data::Story;
use crate::config::Settings;

/// A story is live while strictly younger than the TTL
pub fn is_live(story: &Story, now: i64, ttl_ms: i64) -> bool {
    now.saturating_sub(story.created_at) < ttl_ms
}

/// Periodic expiry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sweeper {
    pub interval: Duration,
    pub ttl_ms: i64,
}

impl Sweeper {
    pub fn new(settings: &Settings) -> Self {
        Self {
            interval: settings.sweep_interval,
            ttl_ms: settings.ttl_ms,
        }
    }

    /// Returns the surviving stories and the indices that expired,
    /// or `None` when nothing expired.
    pub fn sweep(&self, stories: &[Story], now: i64) -> Option<(Vec<Story>, Vec<usize>)> {
        let expired: Vec<usize> = stories
            .iter()
            .enumerate()
            .filter(|(_, story)| !is_live(story, now, self.ttl_ms))
            .map(|(idx, _)| idx)
            .collect();

        if expired.is_empty() {
            return None;
        }

        let live = stories
            .iter()
            .filter(|story| is_live(story, now, self.ttl_ms))
            .cloned()
            .collect();

        Some((live, expired))
    }
}

//! Suppression of duplicate Slack event deliveries.
//!
//! Slack redelivers events (retries, reconnects), so the router checks every
//! `(channel, event ts)` pair against this cache before doing any work.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Bounded, time-expiring set of already-processed event keys.
///
/// Check-and-mark is a single atomic step: two racing calls with the same key
/// can never both observe "should process". When the capacity bound is hit,
/// the oldest entry by insertion order is evicted silently; a very old
/// duplicate may then reprocess, which is an accepted tradeoff.
pub struct DedupCache {
    inner: Mutex<Inner>,
    capacity: usize,
    ttl: Duration,
}

struct Inner {
    // key -> absolute expiry
    entries: HashMap<(String, String), Instant>,
    // insertion order; all entries share one TTL, so this is also expiry order
    order: VecDeque<(String, String)>,
}

impl DedupCache {
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity,
            ttl,
        }
    }

    /// Returns true and marks the key as seen exactly once per TTL window.
    pub fn should_process(&self, channel: &str, event_ts: &str) -> bool {
        self.should_process_at(channel, event_ts, Instant::now())
    }

    fn should_process_at(&self, channel: &str, event_ts: &str, now: Instant) -> bool {
        let key = (channel.to_string(), event_ts.to_string());
        let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        // Entries expire in insertion order, so purging stops at the first live one.
        while let Some(front) = inner.order.front() {
            let expired = inner.entries.get(front).is_none_or(|&expiry| expiry <= now);
            if !expired {
                break;
            }
            let front = front.clone();
            inner.entries.remove(&front);
            inner.order.pop_front();
        }

        if let Some(&expiry) = inner.entries.get(&key)
            && expiry > now
        {
            return false;
        }

        if inner.entries.len() >= self.capacity
            && let Some(oldest) = inner.order.pop_front()
        {
            inner.entries.remove(&oldest);
        }

        inner.entries.insert(key.clone(), now + self.ttl);
        inner.order.push_back(key);
        true
    }
}

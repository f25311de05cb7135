use crate::category::Category;
use crate::host::EntityId;
use rustc_hash::FxHashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThrottleKey {
    pub mob: EntityId,
    pub player: String,
    pub category: Category,
}

impl ThrottleKey {
    pub fn new(mob: EntityId, player: impl Into<String>, category: Category) -> ThrottleKey {
        ThrottleKey {
            mob,
            player: player.into(),
            category,
        }
    }
}

/// Remembers when each mob last spoke to each player about each category.
///
/// Entries live for the whole process and are only ever overwritten.
#[derive(Debug, Default)]
pub struct ThrottleTracker {
    last_sent: Mutex<FxHashMap<ThrottleKey, Instant>>,
}

impl ThrottleTracker {
    pub fn new() -> ThrottleTracker {
        Default::default()
    }

    fn lock(&self) -> MutexGuard<'_, FxHashMap<ThrottleKey, Instant>> {
        // A poisoned map only holds timestamps, it is still usable.
        self.last_sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns true if a message for `key` was attempted at most `window`
    /// before `now`.
    ///
    /// `now` is recorded in every case, so suppressed attempts also push the
    /// quiet period forward. A message goes out again only after `window`
    /// passes without any attempt.
    pub fn should_suppress(&self, key: ThrottleKey, now: Instant, window: Duration) -> bool {
        let previous = self.lock().insert(key, now);
        match previous {
            Some(previous) => now.saturating_duration_since(previous) <= window,
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

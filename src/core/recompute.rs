use std::time::{Duration, Instant};

/// Memoized recomputation of a pure function, keyed on its inputs.
///
/// A value is only ever returned for the key it was computed from. The most
/// recent result is kept until `invalidate`; results for other keys computed
/// within `cooldown` are kept too, so flipping rapidly between a few inputs
/// reuses work instead of recomputing on every flip.
#[derive(Debug)]
pub struct Recompute<K, V> {
    cooldown: Duration,
    recent: Vec<(K, V, Instant)>,
}

impl<K: PartialEq + Clone, V: Clone> Recompute<K, V> {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            recent: Vec::new(),
        }
    }

    pub fn get(&mut self, key: K, now: Instant, compute: impl FnOnce(&K) -> V) -> V {
        self.expire(now);
        if let Some((_, value, _)) = self.recent.iter().find(|(k, _, _)| *k == key) {
            return value.clone();
        }
        let value = compute(&key);
        self.recent.push((key, value.clone(), now));
        value
    }

    /// Number of results currently held.
    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    /// Drop every held result so the next request computes.
    pub fn invalidate(&mut self) {
        self.recent.clear();
    }

    // The newest entry survives expiry; it is the memo for repeat requests.
    fn expire(&mut self, now: Instant) {
        let Some(newest) = self.recent.len().checked_sub(1) else {
            return;
        };
        let cooldown = self.cooldown;
        let mut i = 0;
        self.recent.retain(|(_, _, at)| {
            let keep = i == newest || now.saturating_duration_since(*at) < cooldown;
            i += 1;
            keep
        });
    }
}

//! Read-through cache keyed on age and file modification time

use std::sync::RwLock;
use std::time::{Duration, Instant, SystemTime};

use crate::error::{TrackerError, TrackerResult};

struct CacheSlot<T> {
    value: T,
    loaded_at: Instant,
    modified: Option<SystemTime>,
}

/// Holds one loaded value for at most `ttl`
///
/// A cached value is only served while it is younger than the TTL and the
/// backing file's modification time matches the one seen when it was loaded.
pub struct TtlCache<T> {
    ttl: Duration,
    slot: RwLock<Option<CacheSlot<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached value if still fresh, otherwise call `load` and cache its result
    ///
    /// Errors from `load` are returned and nothing is cached.
    pub fn get_or_load<F>(&self, modified: Option<SystemTime>, load: F) -> TrackerResult<T>
    where
        F: FnOnce() -> TrackerResult<T>,
    {
        {
            let slot = self
                .slot
                .read()
                .map_err(|e| TrackerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

            if let Some(cached) = slot.as_ref() {
                if cached.loaded_at.elapsed() < self.ttl && cached.modified == modified {
                    return Ok(cached.value.clone());
                }
            }
        }

        let value = load()?;

        let mut slot = self
            .slot
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *slot = Some(CacheSlot {
            value: value.clone(),
            loaded_at: Instant::now(),
            modified,
        });

        Ok(value)
    }

    /// Drop the cached value
    pub fn invalidate(&self) {
        // A poisoned lock still holds a slot we can clear
        let mut slot = match self.slot.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = None;
    }

    pub fn is_cached(&self) -> bool {
        self.slot.read().map(|s| s.is_some()).unwrap_or(false)
    }
}

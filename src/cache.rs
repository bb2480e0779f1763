//! Time-boxed vocabulary cache for autocomplete.
//!
//! A single slot holds the last vocabulary built from the catalog and when it
//! was built. The lock is only held to read or swap the slot, never across a
//! rebuild, so concurrent misses may each rebuild. Rebuilds are idempotent and
//! bounded by the capped catalog read; last writer wins.

use crate::search::Vocabulary;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// How long a built vocabulary is reused before the catalog is read again.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Source of "now" for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Slot {
    vocabulary: Arc<Vocabulary>,
    refreshed_at: Instant,
}

/// Single-slot vocabulary cache with a fixed validity window.
pub struct VocabularyCache {
    slot: RwLock<Option<Slot>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for VocabularyCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("VocabularyCache")
            .field("ttl", &self.ttl)
            .field("terms", &slot.as_ref().map(|s| s.vocabulary.len()))
            .finish()
    }
}

impl Default for VocabularyCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl VocabularyCache {
    /// Create an empty cache using the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create an empty cache driven by `clock`.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
            clock,
        }
    }

    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached vocabulary, rebuilding it first if it expired.
    ///
    /// The cached vocabulary is reused while it is younger than the TTL and
    /// non-empty. Otherwise `rebuild` runs. If it fails while an older
    /// vocabulary is still in the slot, the stale one is served; if there is
    /// nothing to fall back on, the error is returned.
    pub fn get_or_refresh<E: fmt::Display>(
        &self,
        rebuild: impl FnOnce() -> Result<Vocabulary, E>,
    ) -> Result<Arc<Vocabulary>, E> {
        let now = self.clock.now();

        if let Some(vocabulary) = self.fresh(now) {
            tracing::debug!("Vocabulary cache hit ({} terms)", vocabulary.len());
            return Ok(vocabulary);
        }

        tracing::debug!("Vocabulary cache miss, rebuilding");
        match rebuild() {
            Ok(vocabulary) => {
                let vocabulary = Arc::new(vocabulary);
                *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(Slot {
                    vocabulary: Arc::clone(&vocabulary),
                    refreshed_at: now,
                });
                Ok(vocabulary)
            }
            Err(e) => match self.cached() {
                Some(stale) => {
                    tracing::warn!(
                        "Vocabulary rebuild failed, serving stale vocabulary ({} terms): {}",
                        stale.len(),
                        e
                    );
                    Ok(stale)
                }
                None => Err(e),
            },
        }
    }

    /// The cached vocabulary regardless of age.
    pub fn cached(&self) -> Option<Arc<Vocabulary>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|slot| Arc::clone(&slot.vocabulary))
    }

    /// Drop the cached vocabulary so the next request rebuilds.
    pub fn invalidate(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn fresh(&self, now: Instant) -> Option<Arc<Vocabulary>> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .filter(|slot| {
                !slot.vocabulary.is_empty()
                    && now.saturating_duration_since(slot.refreshed_at) < self.ttl
            })
            .map(|slot| Arc::clone(&slot.vocabulary))
    }
}

//! # Point Cache
//! Process-wide store of normalized points keyed by the request coordinates.
//!
//! Injected as `Arc<dyn PointCache>`; the client never reaches for a global.
//! Last writer wins. Optional TTL, otherwise entries live until `clear_all`.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::models::NormalizedPoint;

/// Exact (lat, lng) pair. Stored as bit patterns so the key is the literal
/// coordinates, with no rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    lat: u64,
    lng: u64,
}

impl CacheKey {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat: lat.to_bits(),
            lng: lng.to_bits(),
        }
    }

    pub fn lat(&self) -> f64 {
        f64::from_bits(self.lat)
    }

    pub fn lng(&self) -> f64 {
        f64::from_bits(self.lng)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "forecast_points_{}_{}", self.lat(), self.lng())
    }
}

pub trait PointCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<Vec<NormalizedPoint>>;
    fn set(&self, key: CacheKey, value: Vec<NormalizedPoint>);
    fn clear_all(&self);
}

pub type DynPointCache = Arc<dyn PointCache>;

#[derive(Debug)]
struct Entry {
    stored_at: Instant,
    points: Vec<NormalizedPoint>,
}

/// In-memory implementation backed by a `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct InMemoryPointCache {
    inner: RwLock<HashMap<CacheKey, Entry>>,
    ttl: Option<Duration>,
}

impl InMemoryPointCache {
    /// Entries never expire.
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` behaves like `new()`.
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("point cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_fresh(&self, entry: &Entry, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.duration_since(entry.stored_at) < ttl,
            None => true,
        }
    }
}

impl PointCache for InMemoryPointCache {
    fn get(&self, key: &CacheKey) -> Option<Vec<NormalizedPoint>> {
        let now = Instant::now();
        let map = self.inner.read().expect("point cache lock poisoned");
        map.get(key)
            .filter(|e| self.is_fresh(e, now))
            .map(|e| e.points.clone())
    }

    fn set(&self, key: CacheKey, value: Vec<NormalizedPoint>) {
        let now = Instant::now();
        let mut map = self.inner.write().expect("point cache lock poisoned");
        if let Some(ttl) = self.ttl {
            map.retain(|_, e| now.duration_since(e.stored_at) < ttl);
        }
        map.insert(
            key,
            Entry {
                stored_at: now,
                points: value,
            },
        );
    }

    fn clear_all(&self) {
        self.inner
            .write()
            .expect("point cache lock poisoned")
            .clear();
    }
}

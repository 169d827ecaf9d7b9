//! Differential evaluation cache.
//!
//! Slots are keyed by `(layer_id, frame)` and stamped with the layer version
//! current at insertion. `mark_layer_dirty` bumps the version; stale slots are
//! detected lazily on lookup and simply miss. Capacity is bounded: when full,
//! the least recently accessed fraction of slots is evicted in one batch.
//!
//! Every mutation path of a layer must call `mark_layer_dirty` before the
//! next lookup, otherwise stale values are served.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::config::CacheConfig;

/// Hashable frame key; `-0.0` and `0.0` share a slot.
#[inline]
fn frame_key(frame: f64) -> u64 {
    if frame == 0.0 {
        0.0f64.to_bits()
    } else {
        frame.to_bits()
    }
}

#[derive(Clone, Debug)]
struct CacheEntry<V> {
    value: V,
    layer_version: u64,
    last_access: u64,
}

/// Counters for cache behaviour.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
    pub global_version: u64,
}

impl CacheStats {
    #[inline]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug)]
pub struct EvaluationCache<V> {
    cfg: CacheConfig,
    slots: HashMap<String, HashMap<u64, CacheEntry<V>>>,
    versions: HashMap<String, u64>,
    global_version: u64,
    len: usize,
    // Logical clock for last-access stamps.
    clock: u64,
    stats: CacheStats,
}

impl<V: Clone> Default for EvaluationCache<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<V: Clone> EvaluationCache<V> {
    pub fn new(cfg: CacheConfig) -> Self {
        Self {
            cfg,
            slots: HashMap::new(),
            versions: HashMap::new(),
            global_version: 0,
            len: 0,
            clock: 0,
            stats: CacheStats::default(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cfg.max_entries.max(1)
    }

    #[inline]
    pub fn global_version(&self) -> u64 {
        self.global_version
    }

    /// Current version of `layer_id` (0 if it was never marked dirty).
    #[inline]
    pub fn layer_version(&self, layer_id: &str) -> u64 {
        self.versions.get(layer_id).copied().unwrap_or(0)
    }

    /// Invalidate every cached frame of `layer_id`. O(1).
    pub fn mark_layer_dirty(&mut self, layer_id: &str) {
        match self.versions.get_mut(layer_id) {
            Some(v) => *v += 1,
            None => {
                self.versions.insert(layer_id.to_string(), 1);
            }
        }
        self.global_version += 1;
    }

    #[inline]
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Cached value for `(layer_id, frame)` if present and current.
    /// Stale slots count as misses and are left in place.
    pub fn get(&mut self, layer_id: &str, frame: f64) -> Option<&V> {
        let version = self.layer_version(layer_id);
        let now = self.tick();
        let entry = self
            .slots
            .get_mut(layer_id)
            .and_then(|frames| frames.get_mut(&frame_key(frame)));
        match entry {
            Some(entry) if entry.layer_version == version => {
                entry.last_access = now;
                self.stats.hits += 1;
                Some(&entry.value)
            }
            _ => {
                log::trace!("cache miss for {layer_id}@{frame}");
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Store `value` for `(layer_id, frame)` stamped with the layer's current
    /// version, evicting the oldest slots first when full.
    pub fn set(&mut self, layer_id: &str, frame: f64, value: V) {
        let key = frame_key(frame);
        let exists = self
            .slots
            .get(layer_id)
            .is_some_and(|frames| frames.contains_key(&key));
        if !exists && self.len >= self.capacity() {
            self.evict_oldest();
        }

        let entry = CacheEntry {
            value,
            layer_version: self.layer_version(layer_id),
            last_access: self.tick(),
        };
        let frames = self.slots.entry_ref(layer_id).or_default();
        if frames.insert(key, entry).is_none() {
            self.len += 1;
        }
    }

    /// Drop the least recently accessed `eviction_fraction` of slots (at least one).
    fn evict_oldest(&mut self) {
        let fraction = self.cfg.eviction_fraction.clamp(0.0, 1.0);
        let count = ((self.len as f64 * fraction).ceil() as usize).clamp(1, self.len.max(1));

        let mut stamps: Vec<(u64, &str, u64)> = Vec::with_capacity(self.len);
        for (layer, frames) in &self.slots {
            for (key, entry) in frames {
                stamps.push((entry.last_access, layer.as_str(), *key));
            }
        }
        if stamps.is_empty() {
            return;
        }
        let count = count.min(stamps.len());
        stamps.select_nth_unstable_by_key(count - 1, |s| s.0);
        let victims: Vec<(String, u64)> = stamps[..count]
            .iter()
            .map(|(_, layer, key)| (layer.to_string(), *key))
            .collect();

        for (layer, key) in victims {
            if let Some(frames) = self.slots.get_mut(layer.as_str()) {
                if frames.remove(&key).is_some() {
                    self.len -= 1;
                }
                if frames.is_empty() {
                    self.slots.remove(layer.as_str());
                }
            }
        }
        self.stats.evictions += count as u64;
        log::debug!("evicted {count} cache entries ({} remain)", self.len);
    }

    /// Remove every slot of `layer_id` (layer deletion).
    pub fn clear_layer(&mut self, layer_id: &str) {
        if let Some(frames) = self.slots.remove(layer_id) {
            self.len -= frames.len();
        }
    }

    /// Remove every slot; versions are kept.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.len = 0;
    }

    /// Remove every slot and forget all versions (project load).
    pub fn reset(&mut self) {
        self.clear();
        self.versions.clear();
        self.global_version = 0;
        self.clock = 0;
        self.stats = CacheStats::default();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len,
            global_version: self.global_version,
            ..self.stats.clone()
        }
    }
}

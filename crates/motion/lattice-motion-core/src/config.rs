//! Core configuration for lattice-motion-core.

use serde::{Deserialize, Serialize};

use crate::motion::MotionPipelineConfig;

/// Engine sizing and pipeline defaults. Missing fields deserialize to defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub cache: CacheConfig,
    pub motion: MotionPipelineConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Slot count at which eviction kicks in.
    pub max_entries: usize,
    /// Share of slots dropped per eviction pass, oldest first.
    pub eviction_fraction: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 5000,
            eviction_fraction: 0.25,
        }
    }
}

//! Error types for the motion core.
//!
//! Curve math, smoothing, simplification and the cache never fail; these
//! errors come from engine operations that address layers and properties.

use serde::{Deserialize, Serialize};

use crate::value::ValueKind;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MotionError {
    #[error("Layer not found: {layer_id}")]
    LayerNotFound { layer_id: String },

    #[error("Layer already exists: {layer_id}")]
    DuplicateLayer { layer_id: String },

    #[error("Property not found: {path} on layer {layer_id}")]
    PropertyNotFound { layer_id: String, path: String },

    #[error("Keyframe not found: {keyframe_id} on {path}")]
    KeyframeNotFound { path: String, keyframe_id: String },

    #[error("Value type mismatch on {property}: expected {expected:?}, got {actual:?}")]
    ValueTypeMismatch {
        property: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl MotionError {
    /// Coarse category for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::LayerNotFound { .. }
            | Self::DuplicateLayer { .. }
            | Self::PropertyNotFound { .. }
            | Self::KeyframeNotFound { .. } => "data",
            Self::ValueTypeMismatch { .. } => "validation",
            Self::Serialization { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        let e = MotionError::LayerNotFound {
            layer_id: "l1".into(),
        };
        assert_eq!(e.category(), "data");
        assert_eq!(e.to_string(), "Layer not found: l1");

        let e = MotionError::ValueTypeMismatch {
            property: "opacity".into(),
            expected: ValueKind::Number,
            actual: ValueKind::Vec2,
        };
        assert_eq!(e.category(), "validation");
    }

    #[test]
    fn from_json_error() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let e: MotionError = err.into();
        assert_eq!(e.category(), "serialization");
    }
}

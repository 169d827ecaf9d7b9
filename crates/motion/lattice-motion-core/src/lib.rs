//! Lattice Motion Core (engine-agnostic)
//!
//! Data model and algorithms behind layer animation: keyframe curve
//! evaluation, recorded-motion processing (smoothing, conversion,
//! simplification, roving), and a version-tagged evaluation cache that only
//! recomputes layers edited since their last evaluation.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod interp;
pub mod keyframe;
pub mod layer;
pub mod motion;
pub mod property;
pub mod value;

// Re-exports for consumers (adapters)
pub use cache::{CacheStats, EvaluationCache};
pub use config::{CacheConfig, Config};
pub use engine::MotionEngine;
pub use error::MotionError;
pub use evaluate::{
    evaluate_layer, evaluate_layer_cached, evaluate_layers_cached, EvaluatedEffect, EvaluatedLayer,
    EvaluatedTransform,
};
pub use interp::{evaluate_keyframes, evaluate_segment};
pub use keyframe::{BezierHandle, ControlMode, Interpolation, Keyframe};
pub use layer::{EffectInstance, Layer, LayerTransform, PropertyPath};
pub use motion::{
    apply_roving_keyframes, convert_motion_to_keyframes, process_recorded_motion, process_with_config,
    remove_redundant_keyframes, simplify_keyframes, smooth_motion, smooth_motion_moving_average,
    would_roving_change, MotionPipelineConfig, MotionRecorder, MotionSample, RecordedMotion,
    RovingError, RovingOptions, RovingResult,
};
pub use property::{AnimatableProperty, PropertyEdit};
pub use value::{Animatable, PropertyValue, Rgba, ValueKind, Vec2, Vec3};

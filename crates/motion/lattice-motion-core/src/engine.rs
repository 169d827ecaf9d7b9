//! Engine: owns the layers and the evaluation cache.
//!
//! Methods:
//! - layer lifecycle: add_layer, remove_layer, load_layers, update_layer
//! - property editing by path: set_keyframe, remove_keyframe, move_keyframe,
//!   set_interpolation, set_base_value, set_animated, apply_motion_path
//! - evaluation: evaluate_frame, evaluate_layer
//!
//! Every mutation goes through a method that marks the edited layer dirty, so
//! cached snapshots of other layers stay valid.

use crate::cache::{CacheStats, EvaluationCache};
use crate::config::Config;
use crate::error::MotionError;
use crate::evaluate::{evaluate_layer_cached, evaluate_layers_cached, EvaluatedLayer};
use crate::keyframe::Interpolation;
use crate::layer::{Layer, PropertyPath};
use crate::motion::{process_with_config, RecordedMotion};
use crate::property::PropertyEdit;
use crate::value::PropertyValue;

#[derive(Debug)]
pub struct MotionEngine {
    config: Config,
    layers: Vec<Layer>,
    cache: EvaluationCache<EvaluatedLayer>,
}

impl Default for MotionEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl MotionEngine {
    pub fn new(config: Config) -> Self {
        Self {
            cache: EvaluationCache::new(config.cache.clone()),
            config,
            layers: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, layer_id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == layer_id)
    }

    fn index_of(&self, layer_id: &str) -> Result<usize, MotionError> {
        self.layers
            .iter()
            .position(|l| l.id == layer_id)
            .ok_or_else(|| MotionError::LayerNotFound {
                layer_id: layer_id.to_string(),
            })
    }

    pub fn add_layer(&mut self, layer: Layer) -> Result<(), MotionError> {
        if self.layer(&layer.id).is_some() {
            return Err(MotionError::DuplicateLayer { layer_id: layer.id });
        }
        // A re-added id must not pick up slots left from an earlier layer.
        self.cache.mark_layer_dirty(&layer.id);
        self.layers.push(layer);
        Ok(())
    }

    /// Remove a layer and drop its cached frames.
    pub fn remove_layer(&mut self, layer_id: &str) -> Result<Layer, MotionError> {
        let idx = self.index_of(layer_id)?;
        self.cache.clear_layer(layer_id);
        self.cache.mark_layer_dirty(layer_id);
        Ok(self.layers.remove(idx))
    }

    /// Replace every layer (project load). The cache is reset.
    pub fn load_layers(&mut self, layers: Vec<Layer>) -> Result<(), MotionError> {
        for (i, layer) in layers.iter().enumerate() {
            if layers[..i].iter().any(|l| l.id == layer.id) {
                return Err(MotionError::DuplicateLayer {
                    layer_id: layer.id.clone(),
                });
            }
        }
        log::debug!("loading {} layers", layers.len());
        self.cache.reset();
        self.layers = layers;
        Ok(())
    }

    /// Invalidate cached frames of a layer edited outside the engine's methods.
    pub fn mark_layer_dirty(&mut self, layer_id: &str) {
        self.cache.mark_layer_dirty(layer_id);
    }

    /// Edit a layer in place; the layer is marked dirty afterwards.
    pub fn update_layer<R>(
        &mut self,
        layer_id: &str,
        edit: impl FnOnce(&mut Layer) -> R,
    ) -> Result<R, MotionError> {
        let idx = self.index_of(layer_id)?;
        let out = edit(&mut self.layers[idx]);
        self.cache.mark_layer_dirty(layer_id);
        Ok(out)
    }

    /// Run `edit` against the property at `path`, marking the layer dirty on success.
    fn edit_property<R>(
        &mut self,
        layer_id: &str,
        path: &PropertyPath,
        edit: impl FnOnce(&mut dyn PropertyEdit) -> Result<R, MotionError>,
    ) -> Result<R, MotionError> {
        let idx = self.index_of(layer_id)?;
        let prop = self.layers[idx]
            .property_mut(path)
            .ok_or_else(|| MotionError::PropertyNotFound {
                layer_id: layer_id.to_string(),
                path: path.to_string(),
            })?;
        let out = edit(prop)?;
        self.cache.mark_layer_dirty(layer_id);
        Ok(out)
    }

    fn keyframe_missing(path: &PropertyPath, keyframe_id: &str) -> MotionError {
        MotionError::KeyframeNotFound {
            path: path.to_string(),
            keyframe_id: keyframe_id.to_string(),
        }
    }

    /// Set the value at `frame`, creating or updating a keyframe. Returns its id.
    pub fn set_keyframe(
        &mut self,
        layer_id: &str,
        path: &PropertyPath,
        frame: i32,
        value: impl Into<PropertyValue>,
    ) -> Result<String, MotionError> {
        let value = value.into();
        self.edit_property(layer_id, path, |p| p.set_keyframe_value(frame, &value))
    }

    pub fn remove_keyframe(
        &mut self,
        layer_id: &str,
        path: &PropertyPath,
        keyframe_id: &str,
    ) -> Result<(), MotionError> {
        self.edit_property(layer_id, path, |p| {
            p.remove_keyframe_by_id(keyframe_id)
                .then_some(())
                .ok_or_else(|| Self::keyframe_missing(path, keyframe_id))
        })
    }

    pub fn move_keyframe(
        &mut self,
        layer_id: &str,
        path: &PropertyPath,
        keyframe_id: &str,
        frame: i32,
    ) -> Result<(), MotionError> {
        self.edit_property(layer_id, path, |p| {
            p.move_keyframe_by_id(keyframe_id, frame)
                .then_some(())
                .ok_or_else(|| Self::keyframe_missing(path, keyframe_id))
        })
    }

    pub fn set_interpolation(
        &mut self,
        layer_id: &str,
        path: &PropertyPath,
        keyframe_id: &str,
        interpolation: Interpolation,
    ) -> Result<(), MotionError> {
        self.edit_property(layer_id, path, |p| {
            p.set_keyframe_interpolation(keyframe_id, interpolation)
                .then_some(())
                .ok_or_else(|| Self::keyframe_missing(path, keyframe_id))
        })
    }

    pub fn set_base_value(
        &mut self,
        layer_id: &str,
        path: &PropertyPath,
        value: impl Into<PropertyValue>,
    ) -> Result<(), MotionError> {
        let value = value.into();
        self.edit_property(layer_id, path, |p| p.set_base(&value))
    }

    pub fn set_animated(
        &mut self,
        layer_id: &str,
        path: &PropertyPath,
        animated: bool,
    ) -> Result<(), MotionError> {
        self.edit_property(layer_id, path, |p| {
            p.set_animated(animated);
            Ok(())
        })
    }

    /// Replace the layer's position keyframes with the processed `motion`,
    /// using the engine's pipeline settings. Returns the keyframe count.
    pub fn apply_motion_path(
        &mut self,
        layer_id: &str,
        motion: &RecordedMotion,
    ) -> Result<usize, MotionError> {
        let keyframes = process_with_config(motion, &self.config.motion);
        let count = keyframes.len();
        self.update_layer(layer_id, |layer| {
            layer.transform.position.replace_keyframes(keyframes);
        })?;
        Ok(count)
    }

    /// Evaluate every layer at `frame`, in layer order.
    pub fn evaluate_frame(&mut self, frame: f64) -> Vec<EvaluatedLayer> {
        evaluate_layers_cached(&mut self.cache, &self.layers, frame)
    }

    pub fn evaluate_layer(&mut self, layer_id: &str, frame: f64) -> Result<EvaluatedLayer, MotionError> {
        let idx = self.index_of(layer_id)?;
        Ok(evaluate_layer_cached(&mut self.cache, &self.layers[idx], frame))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

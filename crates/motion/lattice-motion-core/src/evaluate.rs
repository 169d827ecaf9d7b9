//! Per-layer evaluation into immutable snapshots, with cached variants.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cache::EvaluationCache;
use crate::layer::Layer;
use crate::property::AnimatableProperty;
use crate::value::{PropertyValue, Vec2};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedTransform {
    pub position: Vec2,
    pub origin: Vec2,
    pub scale: Vec2,
    pub rotation: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedEffect {
    pub id: String,
    pub effect_key: String,
    pub enabled: bool,
    pub parameters: BTreeMap<String, PropertyValue>,
}

/// Snapshot of a layer at one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedLayer {
    pub layer_id: String,
    pub frame: f64,
    pub visible: bool,
    pub transform: EvaluatedTransform,
    pub opacity: f64,
    pub effects: Vec<EvaluatedEffect>,
    pub properties: BTreeMap<String, PropertyValue>,
}

fn resolve_all(props: &[AnimatableProperty<PropertyValue>], frame: f64) -> BTreeMap<String, PropertyValue> {
    props
        .iter()
        .map(|p| (p.name.clone(), p.value_at(frame)))
        .collect()
}

/// Evaluate every property of `layer` at `frame`. Never consults a cache.
pub fn evaluate_layer(layer: &Layer, frame: f64) -> EvaluatedLayer {
    let t = &layer.transform;
    EvaluatedLayer {
        layer_id: layer.id.clone(),
        frame,
        visible: layer.is_visible_at(frame),
        transform: EvaluatedTransform {
            position: t.position.value_at(frame),
            origin: t.origin.value_at(frame),
            scale: t.scale.value_at(frame),
            rotation: t.rotation.value_at(frame),
        },
        opacity: layer.opacity.value_at(frame).clamp(0.0, 100.0),
        effects: layer
            .effects
            .iter()
            .map(|e| EvaluatedEffect {
                id: e.id.clone(),
                effect_key: e.effect_key.clone(),
                enabled: e.enabled,
                parameters: resolve_all(&e.parameters, frame),
            })
            .collect(),
        properties: resolve_all(&layer.properties, frame),
    }
}

/// Cached evaluation: returns the stored snapshot when the layer's version is
/// unchanged since it was stored, otherwise evaluates and stores.
pub fn evaluate_layer_cached(
    cache: &mut EvaluationCache<EvaluatedLayer>,
    layer: &Layer,
    frame: f64,
) -> EvaluatedLayer {
    if let Some(hit) = cache.get(&layer.id, frame) {
        return hit.clone();
    }
    let evaluated = evaluate_layer(layer, frame);
    cache.set(&layer.id, frame, evaluated.clone());
    evaluated
}

/// Batch form of [`evaluate_layer_cached`]; output follows input order.
pub fn evaluate_layers_cached(
    cache: &mut EvaluationCache<EvaluatedLayer>,
    layers: &[Layer],
    frame: f64,
) -> Vec<EvaluatedLayer> {
    layers
        .iter()
        .map(|layer| evaluate_layer_cached(cache, layer, frame))
        .collect()
}

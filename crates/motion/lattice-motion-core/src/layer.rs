//! Layer model consumed by evaluation: transform, opacity, effects and custom
//! properties, each an animatable property.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::property::{AnimatableProperty, PropertyEdit};
use crate::value::{PropertyValue, Vec2};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerTransform {
    pub position: AnimatableProperty<Vec2>,
    pub origin: AnimatableProperty<Vec2>,
    pub scale: AnimatableProperty<Vec2>,
    /// Degrees.
    pub rotation: AnimatableProperty<f64>,
}

impl LayerTransform {
    /// Identity transform: at the origin, unit scale, no rotation.
    pub fn identity(layer_id: &str) -> Self {
        Self {
            position: AnimatableProperty::new(format!("{layer_id}.position"), "position", Vec2::ZERO),
            origin: AnimatableProperty::new(format!("{layer_id}.origin"), "origin", Vec2::ZERO),
            scale: AnimatableProperty::new(format!("{layer_id}.scale"), "scale", Vec2::new(1.0, 1.0)),
            rotation: AnimatableProperty::new(format!("{layer_id}.rotation"), "rotation", 0.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectInstance {
    pub id: String,
    pub effect_key: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub parameters: Vec<AnimatableProperty<PropertyValue>>,
}

impl EffectInstance {
    pub fn new(id: impl Into<String>, effect_key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            effect_key: effect_key.into(),
            name: name.into(),
            enabled: true,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: AnimatableProperty<PropertyValue>) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Parameter by name, falling back to id.
    pub fn parameter_mut(&mut self, key: &str) -> Option<&mut AnimatableProperty<PropertyValue>> {
        let idx = self
            .parameters
            .iter()
            .position(|p| p.name == key)
            .or_else(|| self.parameters.iter().position(|p| p.id == key))?;
        self.parameters.get_mut(idx)
    }
}

fn default_true() -> bool {
    true
}

fn default_out_point() -> i32 {
    i32::MAX
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub in_point: i32,
    #[serde(default = "default_out_point")]
    pub out_point: i32,
    pub transform: LayerTransform,
    /// Percent, clamped to [0, 100] on evaluation.
    pub opacity: AnimatableProperty<f64>,
    #[serde(default)]
    pub effects: Vec<EffectInstance>,
    #[serde(default)]
    pub properties: Vec<AnimatableProperty<PropertyValue>>,
}

impl Layer {
    /// Visible, fully opaque layer with an identity transform spanning all frames.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            transform: LayerTransform::identity(&id),
            opacity: AnimatableProperty::new(format!("{id}.opacity"), "opacity", 100.0),
            name: name.into(),
            visible: true,
            in_point: 0,
            out_point: i32::MAX,
            effects: Vec::new(),
            properties: Vec::new(),
            id,
        }
    }

    pub fn with_range(mut self, in_point: i32, out_point: i32) -> Self {
        self.in_point = in_point;
        self.out_point = out_point;
        self
    }

    pub fn with_effect(mut self, effect: EffectInstance) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_property(mut self, property: AnimatableProperty<PropertyValue>) -> Self {
        self.properties.push(property);
        self
    }

    #[inline]
    pub fn is_visible_at(&self, frame: f64) -> bool {
        self.visible && self.in_point as f64 <= frame && frame <= self.out_point as f64
    }

    pub fn effect_mut(&mut self, effect_id: &str) -> Option<&mut EffectInstance> {
        self.effects.iter_mut().find(|e| e.id == effect_id)
    }

    /// Property addressed by `path`, erased to `PropertyEdit` so callers can
    /// edit any of them with `PropertyValue`s.
    pub fn property_mut(&mut self, path: &PropertyPath) -> Option<&mut dyn PropertyEdit> {
        match path {
            PropertyPath::Position => Some(&mut self.transform.position),
            PropertyPath::Origin => Some(&mut self.transform.origin),
            PropertyPath::Scale => Some(&mut self.transform.scale),
            PropertyPath::Rotation => Some(&mut self.transform.rotation),
            PropertyPath::Opacity => Some(&mut self.opacity),
            PropertyPath::EffectParam { effect_id, param } => self
                .effect_mut(effect_id)?
                .parameter_mut(param)
                .map(|p| p as &mut dyn PropertyEdit),
            PropertyPath::Custom(name) => self
                .properties
                .iter_mut()
                .find(|p| p.name == *name || p.id == *name)
                .map(|p| p as &mut dyn PropertyEdit),
        }
    }
}

/// Address of one animatable property within a layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyPath {
    Position,
    Origin,
    Scale,
    Rotation,
    Opacity,
    EffectParam { effect_id: String, param: String },
    Custom(String),
}

impl PropertyPath {
    pub fn effect_param(effect_id: impl Into<String>, param: impl Into<String>) -> Self {
        Self::EffectParam {
            effect_id: effect_id.into(),
            param: param.into(),
        }
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position => f.write_str("transform.position"),
            Self::Origin => f.write_str("transform.origin"),
            Self::Scale => f.write_str("transform.scale"),
            Self::Rotation => f.write_str("transform.rotation"),
            Self::Opacity => f.write_str("opacity"),
            Self::EffectParam { effect_id, param } => write!(f, "effects.{effect_id}.{param}"),
            Self::Custom(name) => write!(f, "properties.{name}"),
        }
    }
}

//! AnimatableProperty: a constant base value or a sorted keyframe sequence.
//!
//! Keyframe frames are unique and kept ascending. Every editing method keeps
//! that invariant; inserting at an occupied frame replaces the keyframe there.

use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use crate::interp::evaluate_keyframes;
use crate::keyframe::{BezierHandle, Interpolation, Keyframe};
use crate::value::{Animatable, PropertyValue};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimatableProperty<T> {
    pub id: String,
    pub name: String,
    pub base_value: T,
    pub animated: bool,
    #[serde(deserialize_with = "sorted_keyframes")]
    keyframes: Vec<Keyframe<T>>,
}

/// Persisted keyframes are re-sorted on load; later duplicates win.
fn sorted_keyframes<'de, D, T>(deserializer: D) -> Result<Vec<Keyframe<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    let mut keyframes: Vec<Keyframe<T>> = Vec::deserialize(deserializer)?;
    keyframes.sort_by_key(|k| k.frame);
    let mut out: Vec<Keyframe<T>> = Vec::with_capacity(keyframes.len());
    for k in keyframes {
        match out.last_mut() {
            Some(prev) if prev.frame == k.frame => *prev = k,
            _ => out.push(k),
        }
    }
    Ok(out)
}

impl<T: Animatable> AnimatableProperty<T> {
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_value: T) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_value,
            animated: false,
            keyframes: Vec::new(),
        }
    }

    /// Build an animated property from keyframes in any order. Later keyframes
    /// win when two share a frame.
    pub fn with_keyframes(
        id: impl Into<String>,
        name: impl Into<String>,
        base_value: T,
        keyframes: impl IntoIterator<Item = Keyframe<T>>,
    ) -> Self {
        let mut prop = Self::new(id, name, base_value);
        for k in keyframes {
            prop.insert_keyframe(k);
        }
        prop.animated = !prop.keyframes.is_empty();
        prop
    }

    #[inline]
    pub fn keyframes(&self) -> &[Keyframe<T>] {
        &self.keyframes
    }

    #[inline]
    pub fn is_animated(&self) -> bool {
        self.animated && !self.keyframes.is_empty()
    }

    /// Value at `frame`; the base value when not animated.
    pub fn value_at(&self, frame: f64) -> T {
        if !self.animated {
            return self.base_value.clone();
        }
        evaluate_keyframes(&self.keyframes, frame).unwrap_or_else(|| self.base_value.clone())
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.keyframes.iter().position(|k| k.id == id)
    }

    pub fn keyframe(&self, id: &str) -> Option<&Keyframe<T>> {
        self.keyframes.iter().find(|k| k.id == id)
    }

    pub fn keyframe_at(&self, frame: i32) -> Option<&Keyframe<T>> {
        self.keyframes
            .binary_search_by_key(&frame, |k| k.frame)
            .ok()
            .map(|i| &self.keyframes[i])
    }

    /// Insert keeping frames sorted; an existing keyframe at the same frame is replaced.
    pub fn insert_keyframe(&mut self, keyframe: Keyframe<T>) {
        match self.keyframes.binary_search_by_key(&keyframe.frame, |k| k.frame) {
            Ok(i) => self.keyframes[i] = keyframe,
            Err(i) => self.keyframes.insert(i, keyframe),
        }
    }

    /// Set the value at `frame`, updating an existing keyframe or creating a
    /// linear one. Returns the keyframe id. Marks the property animated.
    pub fn set_keyframe(&mut self, frame: i32, value: T) -> String {
        self.animated = true;
        match self.keyframes.binary_search_by_key(&frame, |k| k.frame) {
            Ok(i) => {
                self.keyframes[i].value = value;
                self.keyframes[i].id.clone()
            }
            Err(i) => {
                let k = Keyframe::new(frame, value);
                let id = k.id.clone();
                self.keyframes.insert(i, k);
                id
            }
        }
    }

    /// Replace every keyframe; input order does not matter.
    pub fn replace_keyframes(&mut self, keyframes: impl IntoIterator<Item = Keyframe<T>>) {
        self.keyframes.clear();
        for k in keyframes {
            self.insert_keyframe(k);
        }
        self.animated = !self.keyframes.is_empty();
    }

    pub fn remove_keyframe(&mut self, id: &str) -> Option<Keyframe<T>> {
        let i = self.position_of(id)?;
        let removed = self.keyframes.remove(i);
        if self.keyframes.is_empty() {
            self.animated = false;
        }
        Some(removed)
    }

    /// Move a keyframe to `frame`; a different keyframe already there is replaced.
    pub fn move_keyframe(&mut self, id: &str, frame: i32) -> bool {
        match self.remove_keyframe(id) {
            Some(mut k) => {
                k.frame = frame;
                self.insert_keyframe(k);
                self.animated = true;
                true
            }
            None => false,
        }
    }

    pub fn set_interpolation(&mut self, id: &str, interpolation: Interpolation) -> bool {
        match self.position_of(id) {
            Some(i) => {
                self.keyframes[i].interpolation = interpolation;
                true
            }
            None => false,
        }
    }

    pub fn set_out_handle(&mut self, id: &str, handle: BezierHandle<T>) -> bool {
        match self.position_of(id) {
            Some(i) => {
                self.keyframes[i].set_out_handle(handle);
                true
            }
            None => false,
        }
    }

    pub fn set_in_handle(&mut self, id: &str, handle: BezierHandle<T>) -> bool {
        match self.position_of(id) {
            Some(i) => {
                self.keyframes[i].set_in_handle(handle);
                true
            }
            None => false,
        }
    }
}

/// Object-safe editing surface over `PropertyValue`, so properties of any
/// value type can be edited by path.
pub trait PropertyEdit {
    fn property_name(&self) -> &str;
    fn value_at_dyn(&self, frame: f64) -> PropertyValue;
    fn set_keyframe_value(&mut self, frame: i32, value: &PropertyValue) -> Result<String, MotionError>;
    fn set_base(&mut self, value: &PropertyValue) -> Result<(), MotionError>;
    fn remove_keyframe_by_id(&mut self, id: &str) -> bool;
    fn move_keyframe_by_id(&mut self, id: &str, frame: i32) -> bool;
    fn set_keyframe_interpolation(&mut self, id: &str, interpolation: Interpolation) -> bool;
    fn set_animated(&mut self, animated: bool);
}

impl<T: Animatable> AnimatableProperty<T> {
    fn convert(&self, value: &PropertyValue) -> Result<T, MotionError> {
        let expected = self.base_value.to_value().kind();
        T::from_value(value)
            .filter(|_| value.kind() == expected)
            .ok_or_else(|| MotionError::ValueTypeMismatch {
                property: self.name.clone(),
                expected,
                actual: value.kind(),
            })
    }
}

impl<T: Animatable> PropertyEdit for AnimatableProperty<T> {
    fn property_name(&self) -> &str {
        &self.name
    }

    fn value_at_dyn(&self, frame: f64) -> PropertyValue {
        self.value_at(frame).to_value()
    }

    fn set_keyframe_value(&mut self, frame: i32, value: &PropertyValue) -> Result<String, MotionError> {
        let v = self.convert(value)?;
        Ok(self.set_keyframe(frame, v))
    }

    fn set_base(&mut self, value: &PropertyValue) -> Result<(), MotionError> {
        self.base_value = self.convert(value)?;
        Ok(())
    }

    fn remove_keyframe_by_id(&mut self, id: &str) -> bool {
        self.remove_keyframe(id).is_some()
    }

    fn move_keyframe_by_id(&mut self, id: &str, frame: i32) -> bool {
        self.move_keyframe(id, frame)
    }

    fn set_keyframe_interpolation(&mut self, id: &str, interpolation: Interpolation) -> bool {
        self.set_interpolation(id, interpolation)
    }

    fn set_animated(&mut self, animated: bool) {
        self.animated = animated;
    }
}

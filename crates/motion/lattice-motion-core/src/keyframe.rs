//! Keyframe data model: interpolation modes, Bezier handles, control modes.

use serde::{Deserialize, Serialize};

use crate::value::Animatable;

/// Interpolation used for the segment that starts at a keyframe.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    #[default]
    Linear,
    Bezier,
    Hold,
}

impl Interpolation {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Bezier => "bezier",
            Self::Hold => "hold",
        }
    }
}

impl From<&str> for Interpolation {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "bezier" => Self::Bezier,
            "hold" => Self::Hold,
            _ => Self::Linear,
        }
    }
}

/// How editing one handle affects the opposite handle of the same keyframe.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    /// Opposite handle stays collinear but keeps its own length.
    #[default]
    Smooth,
    /// Handles are independent.
    Corner,
    /// Opposite handle mirrors direction and length.
    Symmetric,
}

/// Handle offset relative to its owning keyframe, in frame-and-value space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BezierHandle<T> {
    pub frame_offset: f64,
    pub value_offset: T,
    pub enabled: bool,
}

impl<T: Animatable> BezierHandle<T> {
    /// A disabled zero handle shaped like `like`.
    pub fn disabled(like: &T) -> Self {
        Self {
            frame_offset: 0.0,
            value_offset: like.zero_like(),
            enabled: false,
        }
    }

    pub fn new(frame_offset: f64, value_offset: T) -> Self {
        Self {
            frame_offset,
            value_offset,
            enabled: true,
        }
    }

    /// Offsets this handle contributes to a curve; disabled handles contribute zero.
    #[inline]
    pub(crate) fn effective(&self) -> (f64, T) {
        if self.enabled {
            (self.frame_offset, self.value_offset.clone())
        } else {
            (0.0, self.value_offset.zero_like())
        }
    }

    #[inline]
    pub(crate) fn is_zero(&self) -> bool {
        !self.enabled || (self.frame_offset == 0.0 && self.value_offset.length() == 0.0)
    }

    fn length(&self) -> f64 {
        self.frame_offset.hypot(self.value_offset.length())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe<T> {
    pub id: String,
    pub frame: i32,
    pub value: T,
    pub interpolation: Interpolation,
    pub in_handle: BezierHandle<T>,
    pub out_handle: BezierHandle<T>,
    pub control_mode: ControlMode,
}

impl<T: Animatable> Keyframe<T> {
    /// Linear keyframe with a fresh random id and disabled handles.
    pub fn new(frame: i32, value: T) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), frame, value)
    }

    pub fn with_id(id: impl Into<String>, frame: i32, value: T) -> Self {
        let in_handle = BezierHandle::disabled(&value);
        let out_handle = BezierHandle::disabled(&value);
        Self {
            id: id.into(),
            frame,
            value,
            interpolation: Interpolation::Linear,
            in_handle,
            out_handle,
            control_mode: ControlMode::Smooth,
        }
    }

    pub fn interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn handles(mut self, in_handle: BezierHandle<T>, out_handle: BezierHandle<T>) -> Self {
        self.in_handle = in_handle;
        self.out_handle = out_handle;
        self
    }

    pub fn control_mode(mut self, mode: ControlMode) -> Self {
        self.control_mode = mode;
        self
    }

    /// Replace the outgoing handle and reconcile the incoming one per `control_mode`.
    pub fn set_out_handle(&mut self, handle: BezierHandle<T>) {
        self.in_handle = opposite_handle(self.control_mode, &handle, &self.in_handle);
        self.out_handle = handle;
    }

    /// Replace the incoming handle and reconcile the outgoing one per `control_mode`.
    pub fn set_in_handle(&mut self, handle: BezierHandle<T>) {
        self.out_handle = opposite_handle(self.control_mode, &handle, &self.out_handle);
        self.in_handle = handle;
    }
}

fn opposite_handle<T: Animatable>(
    mode: ControlMode,
    edited: &BezierHandle<T>,
    opposite: &BezierHandle<T>,
) -> BezierHandle<T> {
    match mode {
        ControlMode::Corner => opposite.clone(),
        ControlMode::Symmetric => BezierHandle {
            frame_offset: -edited.frame_offset,
            value_offset: edited.value_offset.scale(-1.0),
            enabled: edited.enabled,
        },
        ControlMode::Smooth => {
            let edited_len = edited.length();
            let opposite_len = opposite.length();
            if edited_len == 0.0 || opposite_len == 0.0 {
                return opposite.clone();
            }
            let k = -opposite_len / edited_len;
            BezierHandle {
                frame_offset: edited.frame_offset * k,
                value_offset: edited.value_offset.scale(k),
                enabled: opposite.enabled,
            }
        }
    }
}

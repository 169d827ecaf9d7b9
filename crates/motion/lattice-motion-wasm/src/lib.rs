use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use lattice_motion_core::{
    Config, Keyframe, Layer, MotionEngine, PropertyValue, RecordedMotion, RovingOptions, Vec2,
};

#[wasm_bindgen]
pub struct LatticeMotion {
    core: MotionEngine,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Plain JS objects for maps (not `Map`), so snapshots index like JSON.
fn to_js<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<JsValue, JsError> {
    value
        .serialize(&swb::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsError> {
    if jsvalue_is_undefined_or_null(&value) {
        return Err(JsError::new(&format!("{what}: value is null/undefined")));
    }
    swb::from_value(value).map_err(|e| JsError::new(&format!("{what} parse error: {e}")))
}

#[wasm_bindgen]
impl LatticeMotion {
    /// Create a new engine instance. Pass a config object or undefined/null for defaults.
    /// Example:
    ///   new LatticeMotion({ cache: { maxEntries: 2000 } })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<LatticeMotion, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        Ok(LatticeMotion {
            core: MotionEngine::new(cfg),
        })
    }

    /// Replace every layer (project load). Resets the evaluation cache.
    #[wasm_bindgen(js_name = load_layers)]
    pub fn load_layers(&mut self, layers: JsValue) -> Result<(), JsError> {
        let layers: Vec<Layer> = from_js(layers, "load_layers")?;
        self.core
            .load_layers(layers)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(js_name = add_layer)]
    pub fn add_layer(&mut self, layer: JsValue) -> Result<(), JsError> {
        let layer: Layer = from_js(layer, "add_layer")?;
        self.core
            .add_layer(layer)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Remove a layer; returns whether it existed.
    #[wasm_bindgen(js_name = remove_layer)]
    pub fn remove_layer(&mut self, layer_id: String) -> bool {
        self.core.remove_layer(&layer_id).is_ok()
    }

    /// Must be called after any edit made outside this API before the next evaluation.
    #[wasm_bindgen(js_name = mark_layer_dirty)]
    pub fn mark_layer_dirty(&mut self, layer_id: String) {
        self.core.mark_layer_dirty(&layer_id);
    }

    /// Evaluate every layer at `frame`. Returns an array of EvaluatedLayer objects.
    #[wasm_bindgen(js_name = evaluate_frame)]
    pub fn evaluate_frame(&mut self, frame: f64) -> Result<JsValue, JsError> {
        let out = self.core.evaluate_frame(frame);
        to_js(&out, "evaluate_frame")
    }

    #[wasm_bindgen(js_name = evaluate_layer)]
    pub fn evaluate_layer(&mut self, layer_id: String, frame: f64) -> Result<JsValue, JsError> {
        let out = self
            .core
            .evaluate_layer(&layer_id, frame)
            .map_err(|e| JsError::new(&e.to_string()))?;
        to_js(&out, "evaluate_layer")
    }

    /// { hits, misses, evictions, entries, globalVersion }
    #[wasm_bindgen(js_name = cache_stats)]
    pub fn cache_stats(&self) -> Result<JsValue, JsError> {
        to_js(&self.core.cache_stats(), "cache_stats")
    }
}

/// Smooth, convert and simplify a recorded motion. Returns `{x,y}` keyframes.
#[wasm_bindgen(js_name = process_recorded_motion)]
pub fn process_recorded_motion(
    motion: JsValue,
    frame_rate: f64,
    start_frame: i32,
    smoothing_amount: f64,
    simplify_tolerance: f64,
) -> Result<JsValue, JsError> {
    let motion: RecordedMotion = from_js(motion, "process_recorded_motion")?;
    let out = lattice_motion_core::process_recorded_motion(
        &motion,
        frame_rate,
        start_frame,
        smoothing_amount,
        simplify_tolerance,
    );
    to_js(&out, "process_recorded_motion")
}

#[wasm_bindgen(js_name = smooth_motion)]
pub fn smooth_motion(motion: JsValue, smoothing_amount: f64) -> Result<JsValue, JsError> {
    let motion: RecordedMotion = from_js(motion, "smooth_motion")?;
    to_js(
        &lattice_motion_core::smooth_motion(&motion, smoothing_amount),
        "smooth_motion",
    )
}

/// Douglas-Peucker over keyframes of any value shape.
#[wasm_bindgen(js_name = simplify_keyframes)]
pub fn simplify_keyframes(keyframes: JsValue, tolerance: f64) -> Result<JsValue, JsError> {
    let keyframes: Vec<Keyframe<PropertyValue>> = from_js(keyframes, "simplify_keyframes")?;
    to_js(
        &lattice_motion_core::simplify_keyframes(&keyframes, tolerance),
        "simplify_keyframes",
    )
}

/// Retime `{x,y}` keyframes for constant speed. Returns `{ success, keyframes, error }`.
#[wasm_bindgen(js_name = apply_roving_keyframes)]
pub fn apply_roving_keyframes(keyframes: JsValue, options: JsValue) -> Result<JsValue, JsError> {
    let keyframes: Vec<Keyframe<Vec2>> = from_js(keyframes, "apply_roving_keyframes")?;
    let options: RovingOptions = if jsvalue_is_undefined_or_null(&options) {
        RovingOptions::default()
    } else {
        swb::from_value(options).map_err(|e| JsError::new(&format!("roving options error: {e}")))?
    };
    to_js(
        &lattice_motion_core::apply_roving_keyframes(&keyframes, &options),
        "apply_roving_keyframes",
    )
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}

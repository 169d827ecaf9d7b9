#![cfg(target_arch = "wasm32")]
use serde::Serialize;
use serde_json::{json, Value as Json};
use serde_wasm_bindgen as swb;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use lattice_motion_core::{Keyframe, Layer, RecordedMotion, Vec2};
use lattice_motion_wasm::{
    abi_version, apply_roving_keyframes, process_recorded_motion, simplify_keyframes,
    smooth_motion, LatticeMotion,
};

wasm_bindgen_test_configure!(run_in_browser);

fn js(value: &Json) -> JsValue {
    value
        .serialize(&swb::Serializer::json_compatible())
        .unwrap()
}

fn json_of(value: JsValue) -> Json {
    swb::from_value(value).unwrap()
}

fn drag_json() -> Json {
    json!({
        "pinId": "pin",
        "recordingSpeed": 1.0,
        "samples": [
            { "time": 0.0, "x": 0.0, "y": 0.0 },
            { "time": 500.0, "x": 50.0, "y": 50.0 },
            { "time": 1000.0, "x": 100.0, "y": 100.0 }
        ]
    })
}

fn layers_js() -> JsValue {
    let layers = vec![Layer::new("a", "A"), Layer::new("b", "B")];
    swb::to_value(&layers).unwrap()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults_and_config() {
    assert!(LatticeMotion::new(JsValue::UNDEFINED).is_ok());
    assert!(LatticeMotion::new(JsValue::NULL).is_ok());
    assert!(LatticeMotion::new(js(&json!({ "cache": { "maxEntries": 16 } }))).is_ok());
}

#[wasm_bindgen_test]
fn load_evaluate_and_cache() {
    let mut eng = LatticeMotion::new(JsValue::UNDEFINED).unwrap();
    eng.load_layers(layers_js()).unwrap();

    let frame = json_of(eng.evaluate_frame(3.0).unwrap());
    let ids: Vec<&str> = frame
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["layerId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["a", "b"]);
    assert_eq!(frame[0]["opacity"].as_f64(), Some(100.0));

    eng.evaluate_frame(3.0).unwrap();
    let stats = json_of(eng.cache_stats().unwrap());
    assert_eq!(stats["hits"].as_f64(), Some(2.0));
    assert_eq!(stats["misses"].as_f64(), Some(2.0));

    eng.mark_layer_dirty("a".into());
    eng.evaluate_layer("a".into(), 3.0).unwrap();
    let stats = json_of(eng.cache_stats().unwrap());
    assert_eq!(stats["misses"].as_f64(), Some(3.0));
}

#[wasm_bindgen_test]
fn layer_lifecycle_errors() {
    let mut eng = LatticeMotion::new(JsValue::UNDEFINED).unwrap();
    eng.load_layers(layers_js()).unwrap();
    assert!(eng
        .add_layer(swb::to_value(&Layer::new("a", "dup")).unwrap())
        .is_err());
    assert!(eng.remove_layer("a".into()));
    assert!(!eng.remove_layer("a".into()));
    assert!(eng.evaluate_layer("a".into(), 0.0).is_err());
    assert!(eng.load_layers(JsValue::NULL).is_err());
}

#[wasm_bindgen_test]
fn motion_functions_round_trip_plain_objects() {
    let smoothed: RecordedMotion = swb::from_value(smooth_motion(js(&drag_json()), 0.0).unwrap()).unwrap();
    let original: RecordedMotion = serde_json::from_value(drag_json()).unwrap();
    assert_eq!(smoothed, original);

    let keyframes = json_of(process_recorded_motion(js(&drag_json()), 30.0, 0, 0.0, 1.0).unwrap());
    let keyframes = keyframes.as_array().unwrap();
    assert_eq!(keyframes.len(), 2, "straight drag collapses to endpoints");
    assert_eq!(keyframes[1]["frame"].as_f64(), Some(30.0));

    let simplified = json_of(simplify_keyframes(js(&Json::Array(keyframes.clone())), 1.0).unwrap());
    assert_eq!(simplified.as_array().unwrap().len(), 2);
}

#[wasm_bindgen_test]
fn roving_reports_failures_as_values() {
    let two = vec![
        Keyframe::with_id("k0", 0, Vec2::new(0.0, 0.0)),
        Keyframe::with_id("k1", 10, Vec2::new(5.0, 0.0)),
    ];
    let out = json_of(apply_roving_keyframes(swb::to_value(&two).unwrap(), JsValue::UNDEFINED).unwrap());
    assert_eq!(out["success"], json!(false));

    let three = vec![
        Keyframe::with_id("k0", 0, Vec2::new(0.0, 0.0)),
        Keyframe::with_id("k1", 1, Vec2::new(50.0, 0.0)),
        Keyframe::with_id("k2", 10, Vec2::new(100.0, 0.0)),
    ];
    let out = json_of(apply_roving_keyframes(swb::to_value(&three).unwrap(), JsValue::UNDEFINED).unwrap());
    assert_eq!(out["success"], json!(true));
    assert_eq!(out["keyframes"][1]["frame"].as_f64(), Some(5.0));
}

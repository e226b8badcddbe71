//! Calls into the JS object that owns the rendering engine.

use anyhow::anyhow;
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

/// Invoke `target[method](...args)`.
pub fn call(target: &JsValue, method: &str, args: &[JsValue]) -> anyhow::Result<JsValue> {
    let f = Reflect::get(target, &JsValue::from_str(method))
        .map_err(|e| anyhow!("{}: {:?}", method, e))?;
    let f: Function = f
        .dyn_into()
        .map_err(|_| anyhow!("host has no method `{}`", method))?;
    let args: Array = args.iter().collect();
    f.apply(target, &args)
        .map_err(|e| anyhow!("{} threw: {:?}", method, e))
}

/// Like [`call`], for methods whose failure only costs a frame.
pub fn call_quiet(target: &JsValue, method: &str, args: &[JsValue]) {
    if let Err(e) = call(target, method, args) {
        log::trace!("[host] {}", e);
    }
}

pub fn f32_array(values: &[f32]) -> JsValue {
    js_sys::Float32Array::from(values).into()
}

//! WebAssembly bindings for pictexp-rs.
//!
//! This module provides JavaScript-compatible functions via wasm-bindgen
//! for use in browsers and Node.js.

use wasm_bindgen::prelude::*;

/// Image information returned from WASM API.
#[wasm_bindgen]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub widened: bool,
}

/// Decode a PICT resource to RGBA pixels.
#[wasm_bindgen]
pub fn decode_pict(data: &[u8]) -> Result<Vec<u8>, JsValue> {
    let image = crate::decode_pict(data).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(image.bitmap.into_pixels())
}

/// Decode a raw `pict` resource with its `clut` companion to RGBA pixels.
#[wasm_bindgen]
pub fn decode_raw_pict(data: &[u8], clut: &[u8]) -> Result<Vec<u8>, JsValue> {
    let bitmap = crate::load_raw(data, clut).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(bitmap.into_pixels())
}

/// Get the decoded dimensions of a PICT resource.
#[wasm_bindgen]
pub fn get_image_info(data: &[u8]) -> Result<ImageInfo, JsValue> {
    let image = crate::decode_pict(data).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(ImageInfo {
        width: image.bitmap.width(),
        height: image.bitmap.height(),
        widened: image.widened,
    })
}

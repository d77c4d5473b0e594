//! PNG-backed layer bundles.
//!
//! A bundle on disk is a directory of PNG files; each file becomes one named
//! RGBA layer, keyed by its lowercased file stem. Decoding is entirely the
//! image crate's business; this module only moves pixels in and out of the
//! packed `u32` layout the core consumes.

use std::path::Path;

use image::RgbaImage;
use log::{debug, info};
use terrain::{BitmapLayer, BitmapLayers};

use crate::error::{EditorError, EditorResult};

/// Load every `*.png` in `dir` as a layer.
pub fn load_bundle(dir: &Path) -> EditorResult<BitmapLayers> {
    let mut layers = BitmapLayers::new();
    let entries = std::fs::read_dir(dir).map_err(|e| EditorError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| EditorError::io(dir, e))?;
        let path = entry.path();
        let is_png = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("png"))
            .unwrap_or(false);
        if !is_png {
            continue;
        }
        let stem = match path.file_stem().and_then(|s| s.to_str()) {
            Some(s) => s.to_string(),
            None => continue,
        };
        let layer = read_layer_png(&path)?;
        debug!("layer '{}': {}x{}", stem.to_lowercase(), layer.w, layer.h);
        layers.insert(&stem, layer);
    }
    info!("bundle {}: {} layers", dir.display(), layers.len());
    Ok(layers)
}

/// Decode one PNG into a layer.
pub fn read_layer_png(path: &Path) -> EditorResult<BitmapLayer> {
    let img = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(source) => EditorError::io(path, source),
        _ => EditorError::Decode { path: path.into() },
    })?;
    let rgba = img.to_rgba8();
    let (w, h) = (rgba.width() as usize, rgba.height() as usize);
    let pixels = rgba
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            r as u32 | (g as u32) << 8 | (b as u32) << 16 | (a as u32) << 24
        })
        .collect();
    Ok(BitmapLayer::from_rgba(pixels, w, h)?)
}

/// Encode a layer back out as PNG.
pub fn write_layer_png(path: &Path, layer: &BitmapLayer) -> EditorResult<()> {
    let mut bytes = Vec::with_capacity(layer.rgba.len() * 4);
    for &p in &layer.rgba {
        bytes.push(p as u8);
        bytes.push((p >> 8) as u8);
        bytes.push((p >> 16) as u8);
        bytes.push((p >> 24) as u8);
    }
    let img = RgbaImage::from_raw(layer.w as u32, layer.h as u32, bytes)
        .ok_or_else(|| EditorError::Decode { path: path.into() })?;
    img.save(path)
        .map_err(|e| EditorError::image_write(path, e))
}

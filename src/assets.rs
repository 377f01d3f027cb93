//! Base image resolution and decoding.
//!
//! The compositor never does IO itself; it consumes a [`BaseImage`] produced
//! here. Image references are either inline `data:` URIs (the form generated
//! records carry, so no network fetch is ever needed) or filesystem paths.
//! Decoding happens once, before the first draw; a failure here surfaces
//! before any pixel is touched.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::error::{ThumbforgeError, ThumbforgeResult};

/// Decoded base image in straight-alpha RGBA8.
#[derive(Clone, Debug)]
pub struct BaseImage {
    pub width: u32,
    pub height: u32,
    pub rgba8: Arc<Vec<u8>>,
}

/// Resolve an image reference to decoded pixels.
///
/// Supported forms: `data:<mime>;base64,<payload>` and a plain file path.
/// `http(s):` references are rejected; records store their image inline.
pub fn load_base_image(source: &str) -> ThumbforgeResult<BaseImage> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return Err(ThumbforgeError::validation("image reference is empty"));
    }

    if let Some(rest) = trimmed.strip_prefix("data:") {
        let (_mime, payload) = rest.split_once(";base64,").ok_or_else(|| {
            ThumbforgeError::validation("data: image reference must be base64-encoded")
        })?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .context("decode base64 image payload")?;
        return decode_image(&bytes);
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Err(ThumbforgeError::validation(
            "remote image references are not supported; expected a data: URI or file path",
        ));
    }

    let path = trimmed.strip_prefix("file:").unwrap_or(trimmed);
    let bytes = std::fs::read(Path::new(path))
        .with_context(|| format!("read image file '{path}'"))?;
    decode_image(&bytes)
}

/// Decode encoded image bytes (PNG, JPEG, …) into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> ThumbforgeResult<BaseImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(BaseImage {
        width,
        height,
        rgba8: Arc::new(rgba.into_raw()),
    })
}

/// Premultiply straight-alpha RGBA8 in place. The renderer's pixel contract
/// is premultiplied RGBA8 throughout.
pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Undo premultiplication for export encodings that expect straight alpha.
pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 || a == 0 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

/// Encode straight RGBA8 pixels as a PNG file body.
pub fn encode_png(width: u32, height: u32, rgba8: &[u8]) -> ThumbforgeResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(width, height, rgba8.to_vec())
        .ok_or_else(|| ThumbforgeError::render("pixel buffer length mismatch"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// Encode an image as the `data:` URI stored on generated records.
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

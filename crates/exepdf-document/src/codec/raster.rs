// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster image preparation: turns PNG/JPEG bytes into PDF image XObject
// streams. PNG pixels are re-encoded with Flate (alpha goes to a soft mask);
// JPEG data is passed through unchanged under DCTDecode.

use std::io::Write;

use exepdf_core::error::{ExePdfError, Result};
use exepdf_core::types::MediaType;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{DynamicImage, ImageFormat};
use lopdf::{Object, Stream, dictionary};
use tracing::debug;

/// An image ready to be stored in a document.
pub(crate) struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub stream: Stream,
    pub soft_mask: Option<Stream>,
}

/// Decode and convert an image. Only PNG and JPEG are accepted.
pub(crate) fn prepare(bytes: &[u8], media_type: &MediaType) -> Result<RasterImage> {
    match media_type {
        MediaType::Png => prepare_png(bytes),
        MediaType::Jpeg => prepare_jpeg(bytes),
        other => Err(ExePdfError::DecodeFailure(format!(
            "unsupported image type {}",
            other
        ))),
    }
}

fn decode(bytes: &[u8], format: ImageFormat) -> Result<DynamicImage> {
    image::load_from_memory_with_format(bytes, format).map_err(|err| {
        ExePdfError::DecodeFailure(format!("failed to decode {:?} image: {}", format, err))
    })
}

fn prepare_png(bytes: &[u8]) -> Result<RasterImage> {
    let decoded = decode(bytes, ImageFormat::Png)?;
    let (width, height) = (decoded.width(), decoded.height());
    let color = decoded.color();

    let (pixels, color_space, alpha) = match (color.has_color(), color.has_alpha()) {
        (true, true) => {
            let rgba = decoded.to_rgba8();
            let mut pixels = Vec::with_capacity(rgba.len() / 4 * 3);
            let mut alpha = Vec::with_capacity(rgba.len() / 4);
            for pixel in rgba.pixels() {
                pixels.extend_from_slice(&pixel.0[..3]);
                alpha.push(pixel.0[3]);
            }
            (pixels, "DeviceRGB", Some(alpha))
        }
        (false, true) => {
            let luma = decoded.to_luma_alpha8();
            let mut pixels = Vec::with_capacity(luma.len() / 2);
            let mut alpha = Vec::with_capacity(luma.len() / 2);
            for pixel in luma.pixels() {
                pixels.push(pixel.0[0]);
                alpha.push(pixel.0[1]);
            }
            (pixels, "DeviceGray", Some(alpha))
        }
        (true, false) => (decoded.to_rgb8().into_raw(), "DeviceRGB", None),
        (false, false) => (decoded.to_luma8().into_raw(), "DeviceGray", None),
    };

    // A fully opaque alpha channel carries no information.
    let alpha = alpha.filter(|values| values.iter().any(|&a| a != u8::MAX));

    let stream = image_stream(width, height, color_space, "FlateDecode", deflate(&pixels)?);
    let soft_mask = match alpha {
        Some(values) => Some(image_stream(width, height, "DeviceGray", "FlateDecode", deflate(&values)?)),
        None => None,
    };

    debug!(width, height, color_space, has_mask = soft_mask.is_some(), "PNG prepared");
    Ok(RasterImage {
        width,
        height,
        stream,
        soft_mask,
    })
}

fn prepare_jpeg(bytes: &[u8]) -> Result<RasterImage> {
    // Full decode validates the data; the original bytes are embedded.
    let decoded = decode(bytes, ImageFormat::Jpeg)?;
    let (width, height) = (decoded.width(), decoded.height());

    let components = jpeg_components(bytes).unwrap_or(if decoded.color().has_color() { 3 } else { 1 });
    let color_space = match components {
        1 => "DeviceGray",
        4 => "DeviceCMYK",
        _ => "DeviceRGB",
    };

    let mut stream = image_stream(width, height, color_space, "DCTDecode", bytes.to_vec());
    if components == 4 {
        // Adobe CMYK JPEGs store inverted samples.
        let decode = [1, 0, 1, 0, 1, 0, 1, 0].into_iter().map(Object::Integer).collect();
        stream.dict.set("Decode", Object::Array(decode));
    }

    debug!(width, height, components, "JPEG prepared");
    Ok(RasterImage {
        width,
        height,
        stream,
        soft_mask: None,
    })
}

fn image_stream(width: u32, height: u32, color_space: &str, filter: &str, data: Vec<u8>) -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(i64::from(width)),
            "Height" => Object::Integer(i64::from(height)),
            "ColorSpace" => color_space,
            "BitsPerComponent" => Object::Integer(8),
            "Filter" => filter,
        },
        data,
    )
    .with_compression(false)
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Number of colour components declared by the first SOF segment.
fn jpeg_components(bytes: &[u8]) -> Option<u8> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }

    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        match marker {
            // Fill byte.
            0xFF => {
                pos += 1;
                continue;
            }
            // Standalone markers have no length field.
            0x01 | 0xD0..=0xD9 => {
                pos += 2;
                continue;
            }
            0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF => {
                // FF Cn Lh Ll P Yh Yl Xh Xl Nf
                return bytes.get(pos + 9).copied();
            }
            _ => {}
        }
        let length = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        pos += 2 + length;
    }
    None
}

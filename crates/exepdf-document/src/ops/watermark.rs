// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Diagonal translucent text stamped on every page.

use exepdf_core::config::WatermarkStyle;
use exepdf_core::error::Result;
use tracing::{info, instrument};

use crate::codec::DocumentCodec;
use crate::font::StandardFont;
use crate::model::{PageInfo, Rgb, TextStamp};

/// Baseline start for text of `text_width` centred horizontally and placed at
/// half height.
pub fn placement(page: &PageInfo, text_width: f32) -> (f32, f32) {
    (page.width / 2.0 - text_width / 2.0, page.height / 2.0)
}

/// Stamp `text` on every page. Empty text is allowed and draws nothing
/// visible.
#[instrument(skip_all, fields(text_len = text.len()))]
pub fn watermark(
    codec: &dyn DocumentCodec,
    bytes: &[u8],
    text: &str,
    style: &WatermarkStyle,
) -> Result<Vec<u8>> {
    let mut document = codec.decode(bytes)?;
    let font = codec.embed_font(&mut document, StandardFont::HelveticaBold);
    let text_width = font.width_of_text_at_size(text, style.font_size);

    for index in 0..document.page_count() {
        let (x, y) = placement(&document.page(index)?, text_width);
        document.draw_text(
            index,
            &TextStamp {
                text,
                font,
                size: style.font_size,
                x,
                y,
                color: Rgb::gray(style.gray),
                opacity: Some(style.opacity),
                rotation_degrees: style.angle_degrees,
            },
        )?;
    }

    info!(pages = document.page_count(), text_width, "Watermark applied");
    codec.encode(document, None)
}

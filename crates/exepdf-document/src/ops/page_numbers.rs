// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// "n / total" labels in one of six page positions.

use exepdf_core::config::PageNumberStyle;
use exepdf_core::error::Result;
use exepdf_core::types::NumberPosition;
use tracing::{info, instrument};

use crate::codec::DocumentCodec;
use crate::font::StandardFont;
use crate::model::{PageInfo, Rgb, TextStamp};

/// Label for the page at 0-based `index`.
pub fn label(index: usize, total: usize) -> String {
    format!("{} / {}", index + 1, total)
}

/// Baseline start for a label of `text_width` at `position`.
pub fn placement(position: NumberPosition, page: &PageInfo, text_width: f32, margin: f32) -> (f32, f32) {
    let x = match position {
        NumberPosition::BottomLeft | NumberPosition::TopLeft => margin,
        NumberPosition::BottomRight | NumberPosition::TopRight => page.width - text_width - margin,
        NumberPosition::BottomCenter | NumberPosition::TopCenter => (page.width - text_width) / 2.0,
    };
    let y = if position.is_top() {
        page.height - margin
    } else {
        margin
    };
    (x, y)
}

#[instrument(skip_all, fields(position = position.code()))]
pub fn number_pages(
    codec: &dyn DocumentCodec,
    bytes: &[u8],
    position: NumberPosition,
    style: &PageNumberStyle,
) -> Result<Vec<u8>> {
    let mut document = codec.decode(bytes)?;
    let font = codec.embed_font(&mut document, StandardFont::Helvetica);
    let total = document.page_count();

    for index in 0..total {
        let text = label(index, total);
        let text_width = font.width_of_text_at_size(&text, style.font_size);
        let (x, y) = placement(position, &document.page(index)?, text_width, style.margin);

        document.draw_text(
            index,
            &TextStamp {
                text: &text,
                font,
                size: style.font_size,
                x,
                y,
                color: Rgb::BLACK,
                opacity: None,
                rotation_degrees: 0.0,
            },
        )?;
    }

    info!(pages = total, "Page numbers added");
    codec.encode(document, None)
}

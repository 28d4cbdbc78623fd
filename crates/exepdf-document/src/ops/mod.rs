// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transform operations. Each one decodes its inputs through a codec, mutates a
// single `PdfDocument` and encodes it. Page numbers arriving from outside are
// 1-based; everything below the operation boundary is 0-based.

pub mod images;
pub mod insert;
pub mod merge;
pub mod page_numbers;
pub mod protect;
pub mod remove;
pub mod rotate;
pub mod split;
pub mod watermark;

use exepdf_core::error::{ExePdfError, Result};

use crate::codec::DocumentCodec;
use crate::model::PdfDocument;

/// Decode one of several inputs, naming its 1-based position on failure.
pub(crate) fn decode_nth(codec: &dyn DocumentCodec, bytes: &[u8], index: usize) -> Result<PdfDocument> {
    codec.decode(bytes).map_err(|err| match err {
        ExePdfError::DecodeFailure(detail) => {
            ExePdfError::DecodeFailure(format!("document #{}: {}", index + 1, detail))
        }
        other => other,
    })
}

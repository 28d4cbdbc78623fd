// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Split: extract one inclusive page range into a new document.

use exepdf_core::error::{ExePdfError, Result};
use exepdf_core::types::SplitRange;
use tracing::{info, instrument};

use crate::codec::DocumentCodec;

/// Clamp a 1-based inclusive range to the document and convert it to 0-based
/// bounds. Fails when nothing is left to extract.
pub fn resolve_range(range: SplitRange, page_count: usize) -> Result<(usize, usize)> {
    let start = range.start.saturating_sub(1).max(0);
    let end = range.end.saturating_sub(1).min(page_count as i64 - 1);

    if start > end {
        return Err(ExePdfError::InvalidRange {
            detail: format!("pages {} to {} select nothing", range.start, range.end),
            page_count,
        });
    }

    Ok((start as usize, end as usize))
}

#[instrument(skip_all, fields(start = range.start, end = range.end))]
pub fn split_range(codec: &dyn DocumentCodec, bytes: &[u8], range: SplitRange) -> Result<Vec<u8>> {
    let source = codec.decode(bytes)?;
    let (start, end) = resolve_range(range, source.page_count())?;

    let mut output = codec.create();
    let wanted: Vec<usize> = (start..=end).collect();
    let pages = output.import_pages(&source, &wanted)?;
    output.append_pages(&pages);

    info!(
        source_pages = source.page_count(),
        extracted = pages.len(),
        "Split complete"
    );
    codec.encode(output, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::LopdfCodec;
    use crate::fixtures;

    #[test]
    fn middle_range_of_ten() {
        let input = fixtures::pdf_with_pages(10);
        let output = split_range(&LopdfCodec::default(), &input, SplitRange { start: 3, end: 5 }).unwrap();

        assert_eq!(fixtures::page_widths(&output), vec![602.0, 603.0, 604.0]);
        // Source is untouched.
        assert_eq!(fixtures::page_widths(&input).len(), 10);
    }

    #[test]
    fn inverted_range_reports_page_count() {
        let input = fixtures::pdf_with_pages(10);
        let err = split_range(&LopdfCodec::default(), &input, SplitRange { start: 6, end: 3 }).unwrap_err();
        assert!(matches!(err, ExePdfError::InvalidRange { page_count: 10, .. }));
    }

    #[test]
    fn out_of_bounds_values_are_clamped() {
        assert_eq!(resolve_range(SplitRange { start: -4, end: 99 }, 4).unwrap(), (0, 3));
        assert_eq!(resolve_range(SplitRange { start: 0, end: 1 }, 4).unwrap(), (0, 0));
    }

    #[test]
    fn range_past_the_end_is_empty() {
        assert!(resolve_range(SplitRange { start: 5, end: 9 }, 3).is_err());
        assert!(resolve_range(SplitRange { start: 1, end: 1 }, 0).is_err());
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Remove pages by 1-based page number.

use exepdf_core::error::{ExePdfError, Result};
use tracing::{info, instrument};

use crate::codec::DocumentCodec;

/// Turn requested 1-based page numbers into 0-based indices to delete,
/// highest first. Out-of-range numbers and duplicates are dropped.
///
/// Deleting from the highest index down keeps every remaining index valid.
pub fn removal_plan(pages: &[i64], page_count: usize) -> Result<Vec<usize>> {
    let mut indices: Vec<usize> = pages
        .iter()
        .filter_map(|&page| {
            let index = page.checked_sub(1)?;
            (0..page_count as i64).contains(&index).then_some(index as usize)
        })
        .collect();
    indices.sort_unstable_by(|a, b| b.cmp(a));
    indices.dedup();

    if indices.is_empty() {
        return Err(ExePdfError::InvalidRange {
            detail: "none of the requested pages exist".into(),
            page_count,
        });
    }
    if indices.len() == page_count {
        return Err(ExePdfError::DocumentEmpty { page_count });
    }

    Ok(indices)
}

#[instrument(skip_all, fields(requested = pages.len()))]
pub fn remove_pages(codec: &dyn DocumentCodec, bytes: &[u8], pages: &[i64]) -> Result<Vec<u8>> {
    if pages.is_empty() {
        return Err(ExePdfError::InvalidInput("enter pages to remove".into()));
    }

    let mut document = codec.decode(bytes)?;
    let plan = removal_plan(pages, document.page_count())?;

    for &index in &plan {
        document.remove_page(index)?;
    }

    info!(removed = plan.len(), remaining = document.page_count(), "Pages removed");
    codec.encode(document, None)
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Merge: every page of every input, in input order, in one new document.

use exepdf_core::error::{ExePdfError, Result};
use tracing::{debug, info, instrument};

use super::decode_nth;
use crate::codec::DocumentCodec;

/// Concatenate the pages of `inputs`. Any undecodable input aborts the merge.
#[instrument(skip_all, fields(documents = inputs.len()))]
pub fn merge_documents(codec: &dyn DocumentCodec, inputs: &[&[u8]]) -> Result<Vec<u8>> {
    if inputs.is_empty() {
        return Err(ExePdfError::InvalidInput("no documents to merge".into()));
    }

    let mut merged = codec.create();

    for (index, bytes) in inputs.iter().enumerate() {
        let source = decode_nth(codec, bytes, index)?;
        let all: Vec<usize> = (0..source.page_count()).collect();

        let pages = merged.import_pages(&source, &all)?;
        merged.append_pages(&pages);
        debug!(document = index + 1, pages = pages.len(), "Document appended");
    }

    info!(pages = merged.page_count(), "Merge complete");
    codec.encode(merged, None)
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Insert pages from other PDFs or images into a base document.

use exepdf_core::error::{ExePdfError, Result};
use exepdf_core::types::{InputFile, InsertionConfig, MediaType};
use tracing::{debug, info, instrument};

use super::decode_nth;
use crate::codec::DocumentCodec;

/// Insert every page of `sources` contiguously at the resolved position.
///
/// PDF sources contribute all their pages, PNG/JPEG sources one page each
/// sized to the image. The insertion point is resolved against the base page
/// count before anything is inserted.
#[instrument(skip_all, fields(sources = sources.len(), position = ?placement.position))]
pub fn insert_pages(
    codec: &dyn DocumentCodec,
    base: &[u8],
    sources: &[InputFile],
    placement: InsertionConfig,
) -> Result<Vec<u8>> {
    if sources.is_empty() {
        return Err(ExePdfError::InvalidInput("select pages to add".into()));
    }

    let mut document = codec.decode(base)?;
    let at = placement.resolve(document.page_count());

    let mut collected = Vec::new();
    for (index, source) in sources.iter().enumerate() {
        match &source.media_type {
            MediaType::Pdf => {
                let added = decode_nth(codec, &source.bytes, index)?;
                let all: Vec<usize> = (0..added.page_count()).collect();
                collected.extend(document.import_pages(&added, &all)?);
            }
            media_type if media_type.is_image() => {
                let image = codec.embed_image(&mut document, &source.bytes, media_type)?;
                collected.push(document.create_image_page(&image)?);
            }
            other => {
                return Err(ExePdfError::InvalidInput(format!(
                    "{} has unsupported type {}",
                    source.name, other
                )));
            }
        }
        debug!(source = %source.name, collected = collected.len(), "Source collected");
    }

    document.insert_pages(at, &collected);

    info!(at, inserted = collected.len(), total = document.page_count(), "Pages inserted");
    codec.encode(document, None)
}

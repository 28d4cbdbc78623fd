// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// exepdf-document — In-process PDF transformations.
//
// A `DocumentCodec` turns bytes into a page-addressable `PdfDocument` and back.
// The operations in `ops` each apply one mutation (merge, split, insert,
// remove, rotate, watermark, page numbers, protect, images to PDF), and the
// `Engine` dispatches a collaborator's tool request to exactly one of them.

pub mod codec;
pub mod engine;
pub mod fallback;
pub mod font;
pub mod model;
pub mod ops;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export the primary types so callers can use `exepdf_document::Engine` etc.
pub use codec::{DocumentCodec, LopdfCodec, PermissionPolicy, PrintPermission, Protection};
pub use engine::Engine;
pub use font::StandardFont;
pub use model::{FontHandle, ImageHandle, PageHandle, PageInfo, PdfDocument, Rgb, TextStamp};

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for exepdf.

use thiserror::Error;

/// Top-level error type for all exepdf operations.
#[derive(Debug, Error)]
pub enum ExePdfError {
    // -- Input errors --
    /// An input buffer is not a well-formed document or image of its declared
    /// type, or it is encrypted and the password is missing or wrong.
    #[error("failed to decode input: {0}")]
    DecodeFailure(String),

    /// A page range resolved to nothing given the real page count.
    #[error("invalid page range: {detail} (document has {page_count} pages)")]
    InvalidRange { detail: String, page_count: usize },

    /// A removal would leave the document without pages.
    #[error("cannot remove all {page_count} pages from the document")]
    DocumentEmpty { page_count: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The tool has no native transform and the passthrough is disabled.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    // -- Output errors --
    #[error("failed to encode document: {0}")]
    EncodeFailure(String),

    // -- Configuration / collaborator I/O --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ExePdfError>;

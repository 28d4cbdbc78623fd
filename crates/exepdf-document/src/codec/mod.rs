// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The document codec seam: everything that turns bytes into a `PdfDocument`
// and back, plus embedding of fonts and images. Operations only ever talk to
// a `&dyn DocumentCodec`.

pub mod lopdf_codec;
pub(crate) mod raster;

pub use lopdf_codec::LopdfCodec;

use exepdf_core::error::Result;
use exepdf_core::types::MediaType;

use crate::font::StandardFont;
use crate::model::{FontHandle, ImageHandle, PdfDocument};

/// Decodes, encodes and embeds resources into PDF documents.
pub trait DocumentCodec: Send + Sync {
    /// A new document with no pages.
    fn create(&self) -> PdfDocument;

    /// Parse PDF bytes. Encrypted documents are rejected with
    /// `DecodeFailure`.
    fn decode(&self, bytes: &[u8]) -> Result<PdfDocument>;

    /// Parse an encrypted PDF using `password`.
    fn decode_with_password(&self, bytes: &[u8], password: &str) -> Result<PdfDocument>;

    /// Serialise `document`, encrypting it when `protection` is given.
    fn encode(&self, document: PdfDocument, protection: Option<&Protection>) -> Result<Vec<u8>>;

    /// Embed a PNG or JPEG image. Undecodable data fails with
    /// `DecodeFailure`.
    fn embed_image(
        &self,
        document: &mut PdfDocument,
        bytes: &[u8],
        media_type: &MediaType,
    ) -> Result<ImageHandle>;

    /// Register one of the standard fonts with the document.
    fn embed_font(&self, document: &mut PdfDocument, font: StandardFont) -> FontHandle;
}

// ---------------------------------------------------------------------------
// Protection
// ---------------------------------------------------------------------------

/// How printing is allowed in a protected document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintPermission {
    Denied,
    LowResolution,
    HighResolution,
}

/// Permissions granted to someone who opens the document with the user
/// password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionPolicy {
    pub printing: PrintPermission,
    pub modifying: bool,
    pub copying: bool,
    pub annotating: bool,
    pub filling_forms: bool,
    pub content_accessibility: bool,
    pub document_assembly: bool,
}

impl PermissionPolicy {
    /// High-resolution printing only.
    pub fn print_only() -> Self {
        Self {
            printing: PrintPermission::HighResolution,
            modifying: false,
            copying: false,
            annotating: false,
            filling_forms: false,
            content_accessibility: false,
            document_assembly: false,
        }
    }
}

/// Encryption settings applied at encode time.
#[derive(Clone, PartialEq, Eq)]
pub struct Protection {
    pub user_password: String,
    pub owner_password: String,
    pub permissions: PermissionPolicy,
}

impl Protection {
    /// Same password for opening and for owner access, print-only
    /// permissions.
    pub fn with_password(password: &str) -> Self {
        Self {
            user_password: password.to_string(),
            owner_password: password.to_string(),
            permissions: PermissionPolicy::print_only(),
        }
    }
}

impl std::fmt::Debug for Protection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Protection")
            .field("user_password", &"<redacted>")
            .field("owner_password", &"<redacted>")
            .field("permissions", &self.permissions)
            .finish()
    }
}

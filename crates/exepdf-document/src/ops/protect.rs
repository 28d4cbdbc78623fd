// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Password protection with a fixed print-only permission set.

use exepdf_core::error::{ExePdfError, Result};
use exepdf_core::types::EncryptionConfig;
use tracing::{info, instrument};

use crate::codec::{DocumentCodec, Protection};

/// Encrypt the document. The password is both the user and the owner
/// password; readers may print at full resolution and nothing else.
#[instrument(skip_all)]
pub fn protect(codec: &dyn DocumentCodec, bytes: &[u8], config: &EncryptionConfig) -> Result<Vec<u8>> {
    if config.password.is_empty() {
        return Err(ExePdfError::InvalidInput("enter a password".into()));
    }

    let document = codec.decode(bytes)?;
    let pages = document.page_count();
    let output = codec.encode(document, Some(&Protection::with_password(&config.password)))?;

    info!(pages, "Document protected");
    Ok(output)
}

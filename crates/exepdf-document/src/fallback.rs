// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Placeholder for tools without a native transform (office conversion,
// compression, repair, OCR, ...).
//
// PLACEHOLDER: after a simulated processing delay the first input is handed
// back unchanged, with its original media type. Nothing is converted.

use std::time::Duration;

use exepdf_core::error::{ExePdfError, Result};
use exepdf_core::types::{InputFile, ToolOutput};
use tracing::{info, warn};

/// Wait `delay` on the tokio timer, then echo `input`.
pub async fn passthrough(input: &InputFile, file_name: String, delay: Duration) -> Result<ToolOutput> {
    tokio::time::sleep(delay).await;
    Ok(echo(input, file_name))
}

/// Blocking variant of [`passthrough`] for synchronous callers.
pub fn passthrough_blocking(input: &InputFile, file_name: String, delay: Duration) -> Result<ToolOutput> {
    std::thread::sleep(delay);
    Ok(echo(input, file_name))
}

/// Error returned instead of the placeholder when it is disabled.
pub fn disabled(tool: &str) -> ExePdfError {
    warn!(tool, "Unsupported tool requested with passthrough disabled");
    ExePdfError::UnsupportedOperation(tool.to_string())
}

fn echo(input: &InputFile, file_name: String) -> ToolOutput {
    info!(
        file = %input.name,
        media_type = %input.media_type,
        bytes_len = input.bytes.len(),
        "Passthrough: returning input unchanged"
    );
    ToolOutput {
        file_name,
        media_type: input.media_type.clone(),
        bytes: input.bytes.clone(),
    }
}

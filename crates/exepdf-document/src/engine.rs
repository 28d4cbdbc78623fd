// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dispatcher: validates a tool request, routes it to exactly one operation and
// names the result. Holds no mutation logic of its own.

use std::sync::Arc;

use exepdf_core::config::EngineConfig;
use exepdf_core::error::{ExePdfError, Result};
use exepdf_core::types::{InputFile, MediaType, RequestId, ToolConfig, ToolId, ToolOutput, ToolRequest};
use tracing::{Instrument, Span, info, instrument};

use crate::codec::{DocumentCodec, LopdfCodec};
use crate::fallback;
use crate::ops::{images, insert, merge, page_numbers, protect, remove, rotate, split, watermark};

/// The transformation engine. Cheap to clone; clones share the codec.
#[derive(Clone)]
pub struct Engine {
    codec: Arc<dyn DocumentCodec>,
    config: Arc<EngineConfig>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").field("config", &self.config).finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    // -- Construction ---------------------------------------------------------

    /// An engine using the lopdf codec configured from `config`.
    pub fn new(config: EngineConfig) -> Self {
        let codec = Arc::new(LopdfCodec::from_config(&config));
        Self::with_codec(config, codec)
    }

    /// An engine using a caller-supplied codec.
    pub fn with_codec(config: EngineConfig, codec: Arc<dyn DocumentCodec>) -> Self {
        Self {
            codec,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn codec(&self) -> &dyn DocumentCodec {
        self.codec.as_ref()
    }

    // -- Execution ------------------------------------------------------------

    /// Run a request on the current thread. The passthrough delay blocks.
    #[instrument(skip_all, fields(request_id = %RequestId::new(), tool = %request.tool, files = request.files.len()))]
    pub fn run(&self, request: &ToolRequest) -> Result<ToolOutput> {
        validate(request)?;

        if !request.tool.is_native() {
            let (input, file_name) = self.passthrough_target(request)?;
            return fallback::passthrough_blocking(input, file_name, self.config.fallback_delay());
        }

        self.transform(request)
    }

    /// Run a request from async code. Native transforms run on the blocking
    /// pool; the passthrough delay is a tokio timer.
    #[instrument(skip_all, fields(request_id = %RequestId::new(), tool = %request.tool, files = request.files.len()))]
    pub async fn process(&self, request: ToolRequest) -> Result<ToolOutput> {
        validate(&request)?;

        if !request.tool.is_native() {
            let (input, file_name) = self.passthrough_target(&request)?;
            return fallback::passthrough(input, file_name, self.config.fallback_delay())
                .in_current_span()
                .await;
        }

        let engine = self.clone();
        let span = Span::current();
        tokio::task::spawn_blocking(move || span.in_scope(|| engine.transform(&request)))
            .await
            .map_err(|err| ExePdfError::EncodeFailure(format!("transform task failed: {}", err)))?
    }

    fn passthrough_target<'a>(&self, request: &'a ToolRequest) -> Result<(&'a InputFile, String)> {
        if !self.config.passthrough_unsupported {
            return Err(fallback::disabled(request.tool.as_str()));
        }
        let input = first_file(request)?;
        Ok((input, self.output_name(&request.tool, &input.name)))
    }

    fn transform(&self, request: &ToolRequest) -> Result<ToolOutput> {
        let codec = self.codec.as_ref();
        let first = first_file(request)?;

        let bytes = match (&request.tool, &request.config) {
            (ToolId::MergePdf, ToolConfig::Merge) => {
                let inputs: Vec<&[u8]> = request.files.iter().map(|file| file.bytes.as_slice()).collect();
                merge::merge_documents(codec, &inputs)?
            }
            (ToolId::SplitPdf, ToolConfig::Split(range)) => split::split_range(codec, &first.bytes, *range)?,
            (ToolId::RemovePages, ToolConfig::RemovePages { pages }) => {
                remove::remove_pages(codec, &first.bytes, pages)?
            }
            (ToolId::RotatePdf, ToolConfig::Rotate { degrees }) => {
                rotate::rotate_pages(codec, &first.bytes, *degrees)?
            }
            (ToolId::AddPages, ToolConfig::AddPages(placement)) => {
                insert::insert_pages(codec, &first.bytes, &request.files[1..], *placement)?
            }
            (ToolId::WatermarkPdf, ToolConfig::Watermark { text }) => {
                watermark::watermark(codec, &first.bytes, text, &self.config.watermark)?
            }
            (ToolId::PageNumbers, ToolConfig::PageNumbers { position }) => {
                page_numbers::number_pages(codec, &first.bytes, *position, &self.config.page_numbers)?
            }
            (ToolId::ProtectPdf, ToolConfig::Protect(encryption)) => {
                protect::protect(codec, &first.bytes, encryption)?
            }
            (ToolId::JpgToPdf, ToolConfig::ImagesToPdf) => images::images_to_pdf(codec, &request.files)?,
            (tool, _) => return Err(mismatch(tool)),
        };

        let file_name = self.output_name(&request.tool, &first.name);
        info!(file_name = %file_name, output_bytes = bytes.len(), "Tool complete");
        Ok(ToolOutput::pdf(file_name, bytes))
    }

    /// Suggested download name for the result of `tool`.
    pub fn output_name(&self, tool: &ToolId, first_name: &str) -> String {
        match tool {
            ToolId::MergePdf => "merged_document.pdf".to_string(),
            ToolId::SplitPdf => format!("split_{first_name}"),
            ToolId::AddPages => format!("modified_{first_name}"),
            ToolId::JpgToPdf => "images.pdf".to_string(),
            ToolId::ProtectPdf => format!("protected_{first_name}"),
            other => format!("{}_{}_result.pdf", self.config.output_prefix, other.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject malformed requests before any decoding happens.
fn validate(request: &ToolRequest) -> Result<()> {
    if !request.tool.accepts(&request.config) {
        return Err(mismatch(&request.tool));
    }

    match &request.tool {
        ToolId::AddPages if request.files.len() < 2 => {
            return Err(ExePdfError::InvalidInput(
                "select a document and at least one file to add".into(),
            ));
        }
        _ if request.files.is_empty() => {
            return Err(ExePdfError::InvalidInput("no input files".into()));
        }
        _ => {}
    }

    match &request.config {
        ToolConfig::RemovePages { pages } if pages.is_empty() => {
            return Err(ExePdfError::InvalidInput("enter pages to remove".into()));
        }
        ToolConfig::Protect(encryption) if encryption.password.is_empty() => {
            return Err(ExePdfError::InvalidInput("enter a password".into()));
        }
        _ => {}
    }

    // Files that are read as PDFs must be declared as PDFs.
    let pdf_inputs: &[InputFile] = match &request.tool {
        ToolId::MergePdf => &request.files,
        ToolId::JpgToPdf | ToolId::Unsupported(_) => &[],
        _ => &request.files[..1],
    };
    if let Some(file) = pdf_inputs.iter().find(|file| file.media_type != MediaType::Pdf) {
        return Err(ExePdfError::InvalidInput(format!(
            "{} is {}, expected a PDF",
            file.name, file.media_type
        )));
    }

    Ok(())
}

fn first_file(request: &ToolRequest) -> Result<&InputFile> {
    request
        .files
        .first()
        .ok_or_else(|| ExePdfError::InvalidInput("no input files".into()))
}

fn mismatch(tool: &ToolId) -> ExePdfError {
    ExePdfError::InvalidInput(format!("configuration does not match tool {tool}"))
}

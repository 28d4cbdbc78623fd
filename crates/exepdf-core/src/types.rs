// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the exepdf engine: media types, tool identifiers,
// per-tool configuration records, and the request/response envelopes that
// cross the collaborator boundary.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Unique identifier for a single engine invocation (recorded on log spans).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Media types
// ---------------------------------------------------------------------------

/// Declared media type of an input or output buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    Pdf,
    Png,
    Jpeg,
    /// Anything else, carried verbatim (only the passthrough accepts these).
    Other(String),
}

impl MediaType {
    /// MIME type string.
    pub fn mime_type(&self) -> &str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Other(mime) => mime,
        }
    }

    /// Parse a declared MIME type. Matching is case-insensitive and ignores
    /// parameters such as `; charset=...`.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Self::Pdf,
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Self::Jpeg,
            _ => Self::Other(essence.to_string()),
        }
    }

    /// Infer the media type from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "docx" => Some(Self::Other(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document".into(),
            )),
            "xlsx" => Some(Self::Other(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".into(),
            )),
            "pptx" => Some(Self::Other(
                "application/vnd.openxmlformats-officedocument.presentationml.presentation".into(),
            )),
            _ => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Png | Self::Jpeg)
    }
}

impl From<String> for MediaType {
    fn from(mime: String) -> Self {
        Self::from_mime(&mime)
    }
}

impl From<MediaType> for String {
    fn from(media_type: MediaType) -> Self {
        media_type.mime_type().to_string()
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}

// ---------------------------------------------------------------------------
// Tool identifiers
// ---------------------------------------------------------------------------

/// Tool identifier as used by the collaborator's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToolId {
    MergePdf,
    SplitPdf,
    AddPages,
    RemovePages,
    RotatePdf,
    JpgToPdf,
    WatermarkPdf,
    PageNumbers,
    ProtectPdf,
    /// A catalog entry without a native transform (office conversion, OCR,
    /// compression, repair, ...). Served by the passthrough placeholder.
    Unsupported(String),
}

impl ToolId {
    pub fn as_str(&self) -> &str {
        match self {
            Self::MergePdf => "merge-pdf",
            Self::SplitPdf => "split-pdf",
            Self::AddPages => "add-pages",
            Self::RemovePages => "remove-pages",
            Self::RotatePdf => "rotate-pdf",
            Self::JpgToPdf => "jpg-to-pdf",
            Self::WatermarkPdf => "watermark-pdf",
            Self::PageNumbers => "page-numbers",
            Self::ProtectPdf => "protect-pdf",
            Self::Unsupported(id) => id,
        }
    }

    pub fn parse(id: &str) -> Self {
        match id.trim() {
            "merge-pdf" => Self::MergePdf,
            "split-pdf" => Self::SplitPdf,
            "add-pages" => Self::AddPages,
            "remove-pages" => Self::RemovePages,
            "rotate-pdf" => Self::RotatePdf,
            "jpg-to-pdf" => Self::JpgToPdf,
            "watermark-pdf" => Self::WatermarkPdf,
            "page-numbers" => Self::PageNumbers,
            "protect-pdf" => Self::ProtectPdf,
            other => Self::Unsupported(other.to_string()),
        }
    }

    /// Whether this tool has a native transform.
    pub fn is_native(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    /// Whether `config` is the configuration variant this tool expects.
    pub fn accepts(&self, config: &ToolConfig) -> bool {
        matches!(
            (self, config),
            (Self::MergePdf, ToolConfig::Merge)
                | (Self::SplitPdf, ToolConfig::Split(_))
                | (Self::AddPages, ToolConfig::AddPages(_))
                | (Self::RemovePages, ToolConfig::RemovePages { .. })
                | (Self::RotatePdf, ToolConfig::Rotate { .. })
                | (Self::JpgToPdf, ToolConfig::ImagesToPdf)
                | (Self::WatermarkPdf, ToolConfig::Watermark { .. })
                | (Self::PageNumbers, ToolConfig::PageNumbers { .. })
                | (Self::ProtectPdf, ToolConfig::Protect(_))
                | (Self::Unsupported(_), ToolConfig::Passthrough)
        )
    }
}

impl From<String> for ToolId {
    fn from(id: String) -> Self {
        Self::parse(&id)
    }
}

impl From<ToolId> for String {
    fn from(tool: ToolId) -> Self {
        tool.as_str().to_string()
    }
}

impl std::str::FromStr for ToolId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tool configuration
// ---------------------------------------------------------------------------

/// 1-based inclusive page range for the split tool. Values are taken verbatim
/// from the collaborator and clamped against the real page count later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRange {
    pub start: i64,
    pub end: i64,
}

/// Where inserted pages land in the base document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    Start,
    End,
    Specific,
}

/// Insertion point for the add-pages tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertionConfig {
    pub position: InsertPosition,
    /// 1-based page number, only read for [`InsertPosition::Specific`].
    #[serde(default, rename = "specificIndex", alias = "specific_index")]
    pub specific_index: Option<i64>,
}

impl InsertionConfig {
    pub fn start() -> Self {
        Self {
            position: InsertPosition::Start,
            specific_index: None,
        }
    }

    pub fn end() -> Self {
        Self {
            position: InsertPosition::End,
            specific_index: None,
        }
    }

    pub fn specific(page_number: i64) -> Self {
        Self {
            position: InsertPosition::Specific,
            specific_index: Some(page_number),
        }
    }

    /// Resolve to a 0-based insertion point in `[0, page_count]`.
    ///
    /// A missing `specific_index` is treated as page 1.
    pub fn resolve(&self, page_count: usize) -> usize {
        match self.position {
            InsertPosition::Start => 0,
            InsertPosition::End => page_count,
            InsertPosition::Specific => {
                let wanted = self.specific_index.unwrap_or(1).saturating_sub(1);
                wanted.clamp(0, page_count as i64) as usize
            }
        }
    }
}

/// Page-number stamp placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberPosition {
    #[default]
    #[serde(rename = "b-c")]
    BottomCenter,
    #[serde(rename = "b-l")]
    BottomLeft,
    #[serde(rename = "b-r")]
    BottomRight,
    #[serde(rename = "t-c")]
    TopCenter,
    #[serde(rename = "t-l")]
    TopLeft,
    #[serde(rename = "t-r")]
    TopRight,
}

impl NumberPosition {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BottomCenter => "b-c",
            Self::BottomLeft => "b-l",
            Self::BottomRight => "b-r",
            Self::TopCenter => "t-c",
            Self::TopLeft => "t-l",
            Self::TopRight => "t-r",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "b-c" => Some(Self::BottomCenter),
            "b-l" => Some(Self::BottomLeft),
            "b-r" => Some(Self::BottomRight),
            "t-c" => Some(Self::TopCenter),
            "t-l" => Some(Self::TopLeft),
            "t-r" => Some(Self::TopRight),
            _ => None,
        }
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Self::TopCenter | Self::TopLeft | Self::TopRight)
    }
}

/// Password protection settings. The permission set is fixed by the engine.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionConfig {
    pub password: String,
}

impl std::fmt::Debug for EncryptionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionConfig")
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Per-tool configuration record, accepted verbatim from the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ToolConfig {
    Merge,
    Split(SplitRange),
    RemovePages { pages: Vec<i64> },
    AddPages(InsertionConfig),
    Rotate { degrees: i64 },
    Watermark { text: String },
    PageNumbers { position: NumberPosition },
    Protect(EncryptionConfig),
    ImagesToPdf,
    /// No configuration: used with unsupported tools.
    Passthrough,
}

// ---------------------------------------------------------------------------
// Request / response envelopes
// ---------------------------------------------------------------------------

/// One input buffer as supplied by the collaborator.
#[derive(Clone)]
pub struct InputFile {
    pub name: String,
    pub media_type: MediaType,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, media_type: MediaType, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type,
            bytes,
        }
    }

    pub fn pdf(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(name, MediaType::Pdf, bytes)
    }
}

impl std::fmt::Debug for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// A complete tool invocation.
#[derive(Debug, Clone)]
pub struct ToolRequest {
    pub tool: ToolId,
    pub files: Vec<InputFile>,
    pub config: ToolConfig,
}

impl ToolRequest {
    pub fn new(tool: ToolId, files: Vec<InputFile>, config: ToolConfig) -> Self {
        Self {
            tool,
            files,
            config,
        }
    }
}

/// Result buffer handed back to the collaborator for download.
#[derive(Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Suggested download name.
    pub file_name: String,
    pub media_type: MediaType,
    pub bytes: Vec<u8>,
}

impl ToolOutput {
    pub fn pdf(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: MediaType::Pdf,
            bytes,
        }
    }

    /// Lowercase hex SHA-256 of the output bytes.
    pub fn sha256_hex(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

impl std::fmt::Debug for ToolOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolOutput")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_parsing_ignores_case_and_parameters() {
        assert_eq!(MediaType::from_mime("Application/PDF"), MediaType::Pdf);
        assert_eq!(MediaType::from_mime("image/jpeg; q=0.9"), MediaType::Jpeg);
        assert_eq!(
            MediaType::from_mime("text/plain"),
            MediaType::Other("text/plain".into())
        );
    }

    #[test]
    fn tool_ids_round_trip_through_strings() {
        for id in [
            "merge-pdf",
            "split-pdf",
            "add-pages",
            "remove-pages",
            "rotate-pdf",
            "jpg-to-pdf",
            "watermark-pdf",
            "page-numbers",
            "protect-pdf",
        ] {
            let tool = ToolId::parse(id);
            assert!(tool.is_native(), "{id} should be native");
            assert_eq!(tool.as_str(), id);
        }
        assert_eq!(
            ToolId::parse("word-to-pdf"),
            ToolId::Unsupported("word-to-pdf".into())
        );
    }

    #[test]
    fn insertion_resolves_against_page_count() {
        assert_eq!(InsertionConfig::start().resolve(3), 0);
        assert_eq!(InsertionConfig::end().resolve(3), 3);
        assert_eq!(InsertionConfig::specific(2).resolve(3), 1);
        assert_eq!(InsertionConfig::specific(99).resolve(3), 3);
        assert_eq!(InsertionConfig::specific(-4).resolve(3), 0);

        let missing = InsertionConfig {
            position: InsertPosition::Specific,
            specific_index: None,
        };
        assert_eq!(missing.resolve(3), 0);
    }

    #[test]
    fn tool_config_deserializes_from_collaborator_json() {
        let json = r#"{"type":"page-numbers","position":"t-r"}"#;
        let config: ToolConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config,
            ToolConfig::PageNumbers {
                position: NumberPosition::TopRight
            }
        );

        let json = r#"{"type":"add-pages","position":"specific","specific_index":2}"#;
        let config: ToolConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config, ToolConfig::AddPages(InsertionConfig::specific(2)));

        let json = r#"{"type":"add-pages","position":"specific","specificIndex":3}"#;
        let config: ToolConfig = serde_json::from_str(json).unwrap();
        let ToolConfig::AddPages(insertion) = &config else {
            panic!("expected add-pages config, got {config:?}");
        };
        assert_eq!(insertion.specific_index, Some(3));
        assert_eq!(insertion.resolve(5), 2);

        let json = r#"{"type":"split","start":3,"end":5}"#;
        let config: ToolConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config, ToolConfig::Split(SplitRange { start: 3, end: 5 }));
    }

    #[test]
    fn tool_accepts_only_its_own_config() {
        assert!(ToolId::RotatePdf.accepts(&ToolConfig::Rotate { degrees: 90 }));
        assert!(!ToolId::RotatePdf.accepts(&ToolConfig::Merge));
        assert!(ToolId::Unsupported("ocr-pdf".into()).accepts(&ToolConfig::Passthrough));
    }

    #[test]
    fn encryption_config_debug_hides_password() {
        let config = EncryptionConfig {
            password: "hunter2".into(),
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn output_fingerprint_is_sha256() {
        let output = ToolOutput::pdf("x.pdf", b"hello".to_vec());
        assert_eq!(
            output.sha256_hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}

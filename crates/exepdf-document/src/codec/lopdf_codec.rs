// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `DocumentCodec` backed by the `lopdf` crate.

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use exepdf_core::config::EngineConfig;
use exepdf_core::error::{ExePdfError, Result};
use exepdf_core::types::MediaType;
use lopdf::xref::XrefEntry;
use lopdf::{
    Dictionary, Document, EncryptionState, EncryptionVersion, Object, ObjectId, Permissions, Reader,
    StringFormat,
};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::raster;
use super::{DocumentCodec, PermissionPolicy, PrintPermission, Protection};
use crate::font::StandardFont;
use crate::model::{FontHandle, ImageHandle, PdfDocument};

/// Value written to `/Producer` in every output.
const PRODUCER: &str = "exepdf";

/// RC4 key length for the standard security handler (V2/R3).
const KEY_LENGTH_BITS: usize = 128;

/// The default codec.
#[derive(Debug, Clone)]
pub struct LopdfCodec {
    /// Header version of documents created from scratch.
    pdf_version: String,
    compress: bool,
}

impl Default for LopdfCodec {
    fn default() -> Self {
        Self::new("1.7", true)
    }
}

impl LopdfCodec {
    pub fn new(pdf_version: impl Into<String>, compress: bool) -> Self {
        Self {
            pdf_version: pdf_version.into(),
            compress,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.pdf_version.clone(), config.compress_streams)
    }
}

impl DocumentCodec for LopdfCodec {
    fn create(&self) -> PdfDocument {
        PdfDocument::new(&self.pdf_version)
    }

    #[instrument(skip_all, fields(bytes_len = bytes.len()))]
    fn decode(&self, bytes: &[u8]) -> Result<PdfDocument> {
        let document = Document::load_mem(bytes)
            .map_err(|err| ExePdfError::DecodeFailure(format!("failed to load PDF: {}", err)))?;

        if document.is_encrypted() {
            return Err(ExePdfError::DecodeFailure(
                "document is encrypted and needs a password".into(),
            ));
        }

        PdfDocument::from_lopdf(document)
    }

    #[instrument(skip_all, fields(bytes_len = bytes.len()))]
    fn decode_with_password(&self, bytes: &[u8], password: &str) -> Result<PdfDocument> {
        let document = Document::load_mem(bytes)
            .map_err(|err| ExePdfError::DecodeFailure(format!("failed to load PDF: {}", err)))?;

        if !document.is_encrypted() {
            return PdfDocument::from_lopdf(document);
        }

        let mut document = if document.encryption_state.is_some() {
            // Opened with the empty user password while loading.
            document
        } else {
            let mut document = load_encrypted_objects(bytes, document);
            document.decrypt(password).map_err(|err| {
                ExePdfError::DecodeFailure(format!("failed to decrypt PDF (wrong password?): {}", err))
            })?;
            document
        };

        // Re-encoding starts from plain objects.
        if let Ok(id) = document.trailer.get(b"Encrypt").and_then(Object::as_reference) {
            document.objects.remove(&id);
        }
        document.trailer.remove(b"Encrypt");
        document.encryption_state = None;

        PdfDocument::from_lopdf(document)
    }

    #[instrument(skip_all, fields(pages = document.page_count(), encrypted = protection.is_some()))]
    fn encode(&self, document: PdfDocument, protection: Option<&Protection>) -> Result<Vec<u8>> {
        let mut inner = document.into_lopdf()?;

        stamp_info(&mut inner);
        ensure_file_id(&mut inner);
        let pruned = inner.prune_objects();
        if self.compress {
            inner.compress();
        }

        if let Some(protection) = protection {
            encrypt(&mut inner, protection)?;
        }

        let mut output = Vec::new();
        inner.save_to(&mut output).map_err(|err| {
            ExePdfError::EncodeFailure(format!("failed to serialise PDF: {}", err))
        })?;

        debug!(pruned = pruned.len(), output_bytes = output.len(), "Document encoded");
        Ok(output)
    }

    fn embed_image(
        &self,
        document: &mut PdfDocument,
        bytes: &[u8],
        media_type: &MediaType,
    ) -> Result<ImageHandle> {
        let image = raster::prepare(bytes, media_type)?;
        Ok(document.add_image(image))
    }

    fn embed_font(&self, document: &mut PdfDocument, font: StandardFont) -> FontHandle {
        document.standard_font(font)
    }
}

// ---------------------------------------------------------------------------
// Decode helpers
// ---------------------------------------------------------------------------

/// Parse every object of an encrypted file that the loader left unparsed.
///
/// `shell` is the result of `Document::load_mem` on `bytes`: it holds the
/// trailer, the cross-reference table and the `/Encrypt` dictionary. Objects
/// are returned still encrypted; `Document::decrypt` finishes the job.
fn load_encrypted_objects(bytes: &[u8], shell: Document) -> Document {
    // Xref offsets count from the header, like the loader does.
    let start = bytes.windows(5).position(|window| window == b"%PDF-").unwrap_or(0);

    let ids: Vec<ObjectId> = shell
        .reference_table
        .entries
        .iter()
        .filter_map(|(&number, entry)| match *entry {
            XrefEntry::Normal { generation, .. } => Some((number, generation)),
            _ => None,
        })
        .collect();

    let reader = Reader {
        buffer: &bytes[start..],
        document: shell,
        encryption_state: None,
        raw_objects: BTreeMap::new(),
    };

    let mut objects = BTreeMap::new();
    for id in ids {
        match reader.get_object(id, &mut HashSet::new()) {
            Ok(object) => {
                objects.insert(id, object);
            }
            Err(err) => warn!(object = ?id, error = %err, "Skipping unreadable object"),
        }
    }

    let mut document = reader.document;
    for (id, object) in objects {
        document.objects.entry(id).or_insert(object);
    }
    debug!(objects = document.objects.len(), "Encrypted objects parsed");
    document
}

// ---------------------------------------------------------------------------
// Encode helpers
// ---------------------------------------------------------------------------

/// Set `/Producer` and `/ModDate` on the document information dictionary,
/// creating it when absent.
fn stamp_info(document: &mut Document) {
    let modified = format!("D:{}Z", Utc::now().format("%Y%m%d%H%M%S"));

    let info_id = match document.trailer.get(b"Info").and_then(Object::as_reference) {
        Ok(id) if document.get_object(id).and_then(Object::as_dict).is_ok() => id,
        _ => {
            let id = document.add_object(Dictionary::new());
            document.trailer.set("Info", Object::Reference(id));
            id
        }
    };

    if let Ok(info) = document.get_object_mut(info_id).and_then(Object::as_dict_mut) {
        info.set("Producer", Object::string_literal(PRODUCER));
        info.set("ModDate", Object::string_literal(modified));
    }
}

/// The security handler derives its key from the first file identifier.
fn ensure_file_id(document: &mut Document) {
    if document.trailer.has(b"ID") {
        return;
    }

    let id = Uuid::new_v4().as_bytes().to_vec();
    document.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(id.clone(), StringFormat::Hexadecimal),
            Object::String(id, StringFormat::Hexadecimal),
        ]),
    );
}

fn encrypt(document: &mut Document, protection: &Protection) -> Result<()> {
    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &*document,
        owner_password: &protection.owner_password,
        user_password: &protection.user_password,
        key_length: KEY_LENGTH_BITS,
        permissions: permissions_for(&protection.permissions),
    })
    .map_err(|err| ExePdfError::EncodeFailure(format!("failed to set up encryption: {}", err)))?;

    document
        .encrypt(&state)
        .map_err(|err| ExePdfError::EncodeFailure(format!("failed to encrypt PDF: {}", err)))
}

fn permissions_for(policy: &PermissionPolicy) -> Permissions {
    let mut permissions = Permissions::empty();
    match policy.printing {
        PrintPermission::Denied => {}
        PrintPermission::LowResolution => permissions |= Permissions::PRINTABLE,
        PrintPermission::HighResolution => {
            permissions |= Permissions::PRINTABLE | Permissions::PRINTABLE_IN_HIGH_QUALITY
        }
    }
    permissions.set(Permissions::MODIFIABLE, policy.modifying);
    permissions.set(Permissions::COPYABLE, policy.copying);
    permissions.set(Permissions::ANNOTABLE, policy.annotating);
    permissions.set(Permissions::FILLABLE, policy.filling_forms);
    permissions.set(Permissions::COPYABLE_FOR_ACCESSIBILITY, policy.content_accessibility);
    permissions.set(Permissions::ASSEMBLABLE, policy.document_assembly);
    permissions
}

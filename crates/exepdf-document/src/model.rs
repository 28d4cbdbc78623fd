// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory PDF document: a lopdf object store plus an explicit page order.
//
// Every page hangs directly off a single root `/Pages` node. Inheritable page
// attributes are pushed down onto each page when a document is loaded, so a
// page keeps its size, resources and rotation when it is moved to another
// position or another document. The page tree itself is only rebuilt from
// `order` when the document is encoded.

use std::collections::{BTreeMap, HashMap, HashSet};

use exepdf_core::error::{ExePdfError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use tracing::{debug, warn};

use crate::codec::raster::RasterImage;
use crate::font::{StandardFont, encode_win_ansi};

/// Page attributes that may be inherited from `/Pages` ancestors.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// US Letter, used when a page has no MediaBox anywhere in its ancestry.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Upper bound on reference chains followed when resolving a value.
const MAX_INDIRECTION: usize = 16;

// ---------------------------------------------------------------------------
// Handles and value types
// ---------------------------------------------------------------------------

/// A page object owned by a [`PdfDocument`]. Only meaningful for the document
/// that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageHandle(ObjectId);

/// A standard font registered in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontHandle {
    font: StandardFont,
    id: ObjectId,
}

impl FontHandle {
    pub fn font(&self) -> StandardFont {
        self.font
    }

    pub fn width_of_text_at_size(&self, text: &str, size: f32) -> f32 {
        self.font.width_of_text_at_size(text, size)
    }
}

/// An image XObject embedded in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHandle {
    id: ObjectId,
    width: u32,
    height: u32,
}

impl ImageHandle {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Geometry of a single page in user space units (points).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageInfo {
    pub width: f32,
    pub height: f32,
    /// Lower-left corner of the MediaBox. Usually (0, 0).
    pub origin_x: f32,
    pub origin_y: f32,
    /// Effective `/Rotate`, normalised to `[0, 360)`.
    pub rotation: i64,
}

/// Fill colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn gray(level: f32) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
        }
    }
}

/// A single line of text drawn over a page.
#[derive(Debug, Clone, Copy)]
pub struct TextStamp<'a> {
    pub text: &'a str,
    pub font: FontHandle,
    pub size: f32,
    /// Baseline start, relative to the page's MediaBox origin.
    pub x: f32,
    pub y: f32,
    pub color: Rgb,
    /// Fill alpha; `None` draws fully opaque without an ExtGState.
    pub opacity: Option<f32>,
    /// Counter-clockwise rotation about `(x, y)`.
    pub rotation_degrees: f32,
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A PDF document being transformed.
pub struct PdfDocument {
    inner: Document,
    pages_root: ObjectId,
    /// Authoritative page order.
    order: Vec<ObjectId>,
    fonts: HashMap<StandardFont, ObjectId>,
    /// ExtGState objects keyed by the bit pattern of their fill alpha.
    opacity_states: Vec<(u32, ObjectId)>,
    /// Pages whose original content has already been wrapped in `q ... Q`.
    isolated: HashSet<ObjectId>,
    image_count: usize,
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("version", &self.inner.version)
            .field("pages", &self.order.len())
            .field("objects", &self.inner.objects.len())
            .finish()
    }
}

impl PdfDocument {
    // -- Construction ---------------------------------------------------------

    /// An empty document with no pages.
    pub(crate) fn new(version: &str) -> Self {
        let mut inner = Document::with_version(version);
        let pages_root = inner.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Object::Array(Vec::new()),
            "Count" => Object::Integer(0),
        });
        let catalog = inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_root),
        });
        inner.trailer.set("Root", Object::Reference(catalog));

        Self::assemble(inner, pages_root, Vec::new())
    }

    /// Adopt a parsed lopdf document, flattening its page tree.
    pub(crate) fn from_lopdf(mut inner: Document) -> Result<Self> {
        let pages_root = inner
            .catalog()
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .map_err(|err| {
                ExePdfError::DecodeFailure(format!("document has no page tree: {}", err))
            })?;

        let order: Vec<ObjectId> = inner.get_pages().into_values().collect();
        for &page_id in &order {
            push_down_inherited(&mut inner, page_id);
        }

        debug!(pages = order.len(), objects = inner.objects.len(), "Document adopted");
        Ok(Self::assemble(inner, pages_root, order))
    }

    fn assemble(inner: Document, pages_root: ObjectId, order: Vec<ObjectId>) -> Self {
        Self {
            inner,
            pages_root,
            order,
            fonts: HashMap::new(),
            opacity_states: Vec::new(),
            isolated: HashSet::new(),
            image_count: 0,
        }
    }

    /// Rebuild the page tree from the page order and hand back the lopdf
    /// document. Unreachable objects are left for the encoder to prune.
    pub(crate) fn into_lopdf(mut self) -> Result<Document> {
        let order = std::mem::take(&mut self.order);
        for &page_id in &order {
            let root = self.pages_root;
            self.dictionary_mut(page_id)?
                .set("Parent", Object::Reference(root));
        }

        let kids: Vec<Object> = order.iter().map(|id| Object::Reference(*id)).collect();
        let root = self.dictionary_mut(self.pages_root)?;
        root.set("Count", Object::Integer(kids.len() as i64));
        root.set("Kids", Object::Array(kids));

        Ok(self.inner)
    }

    // -- Inspection -----------------------------------------------------------

    pub fn page_count(&self) -> usize {
        self.order.len()
    }

    /// Geometry of the page at `index` (0-based).
    pub fn page(&self, index: usize) -> Result<PageInfo> {
        let page = self.dictionary(self.page_id(index)?)?;

        let media_box = page
            .get(b"MediaBox")
            .ok()
            .and_then(|value| self.number_array(value))
            .filter(|values| values.len() == 4)
            .unwrap_or_else(|| DEFAULT_MEDIA_BOX.to_vec());
        let (x0, y0, x1, y1) = (media_box[0], media_box[1], media_box[2], media_box[3]);

        Ok(PageInfo {
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
            origin_x: x0.min(x1),
            origin_y: y0.min(y1),
            rotation: self.rotation_of(page),
        })
    }

    /// Geometry of every page, in order.
    pub fn pages(&self) -> Result<Vec<PageInfo>> {
        (0..self.page_count()).map(|index| self.page(index)).collect()
    }

    // -- Page order -----------------------------------------------------------

    /// Drop the page at `index` from the page order.
    pub fn remove_page(&mut self, index: usize) -> Result<()> {
        self.page_id(index)?;
        self.order.remove(index);
        Ok(())
    }

    /// Copy pages of `source` (by 0-based index) into this document. The
    /// copies are detached: place them with [`PdfDocument::insert_pages`].
    ///
    /// Objects shared between the copied pages are copied once.
    pub fn import_pages(&mut self, source: &PdfDocument, indices: &[usize]) -> Result<Vec<PageHandle>> {
        let mut copied: BTreeMap<ObjectId, ObjectId> = BTreeMap::new();
        let mut imported: HashSet<ObjectId> = HashSet::new();
        let mut handles = Vec::with_capacity(indices.len());

        for &index in indices {
            let source_id = source.page_id(index)?;
            let page = source.dictionary(source_id)?;

            // A page already reached through another page's links (e.g. a
            // /Dest) reuses that copy, so the link lands on the real page.
            let target_id = match copied.get(&source_id) {
                Some(&id) if !imported.contains(&id) => id,
                _ => {
                    let id = self.inner.new_object_id();
                    copied.insert(source_id, id);
                    id
                }
            };
            imported.insert(target_id);

            let mut dict = Dictionary::new();
            for (key, value) in page.iter() {
                if key.as_slice() == b"Parent" {
                    continue;
                }
                let value = self.copy_object(&source.inner, value, &mut copied);
                dict.set(key.clone(), value);
            }
            dict.set("Parent", Object::Reference(self.pages_root));
            self.inner.objects.insert(target_id, Object::Dictionary(dict));
            handles.push(PageHandle(target_id));
        }

        debug!(pages = handles.len(), objects_copied = copied.len(), "Pages imported");
        Ok(handles)
    }

    /// Place pages at `at` (clamped to the page count), preserving their order.
    pub fn insert_pages(&mut self, at: usize, pages: &[PageHandle]) {
        let at = at.min(self.order.len());
        self.order.splice(at..at, pages.iter().map(|page| page.0));
    }

    pub fn append_pages(&mut self, pages: &[PageHandle]) {
        self.insert_pages(self.order.len(), pages);
    }

    // -- Page attributes ------------------------------------------------------

    /// Set `/Rotate` on the page at `index`, normalised to `[0, 360)`.
    pub fn set_rotation(&mut self, index: usize, degrees: i64) -> Result<()> {
        let page_id = self.page_id(index)?;
        self.dictionary_mut(page_id)?
            .set("Rotate", Object::Integer(degrees.rem_euclid(360)));
        Ok(())
    }

    // -- Resources ------------------------------------------------------------

    /// Register a standard font, once per document.
    pub(crate) fn standard_font(&mut self, font: StandardFont) -> FontHandle {
        let id = match self.fonts.get(&font) {
            Some(&id) => id,
            None => {
                let id = self.inner.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => font.base_font(),
                    "Encoding" => "WinAnsiEncoding",
                });
                self.fonts.insert(font, id);
                id
            }
        };
        FontHandle { font, id }
    }

    /// Store a prepared raster image as an image XObject.
    pub(crate) fn add_image(&mut self, image: RasterImage) -> ImageHandle {
        let RasterImage {
            width,
            height,
            mut stream,
            soft_mask,
        } = image;

        if let Some(mask) = soft_mask {
            let mask_id = self.inner.add_object(mask);
            stream.dict.set("SMask", Object::Reference(mask_id));
        }

        let id = self.inner.add_object(stream);
        ImageHandle { id, width, height }
    }

    /// Create a detached page the size of `image` (1 pt per pixel) showing
    /// the image edge to edge.
    pub fn create_image_page(&mut self, image: &ImageHandle) -> Result<PageHandle> {
        self.image_count += 1;
        let name = format!("ExePdfIm{}", self.image_count);
        let (width, height) = (image.width as f32, image.height as f32);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(width),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(height),
                        Object::Integer(0),
                        Object::Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(name.clone().into_bytes())]),
                Operation::new("Q", vec![]),
            ],
        };
        let data = content.encode().map_err(|err| {
            ExePdfError::EncodeFailure(format!("failed to encode image page content: {}", err))
        })?;
        let content_id = self.inner.add_object(Stream::new(Dictionary::new(), data));

        let mut xobjects = Dictionary::new();
        xobjects.set(name, Object::Reference(image.id));

        let page_id = self.inner.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(self.pages_root),
            "MediaBox" => Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(i64::from(image.width)),
                Object::Integer(i64::from(image.height)),
            ]),
            "Resources" => dictionary! {
                "XObject" => xobjects,
            },
            "Contents" => Object::Reference(content_id),
        });

        Ok(PageHandle(page_id))
    }

    // -- Drawing --------------------------------------------------------------

    /// Draw one line of text over the page at `index`.
    ///
    /// The page's existing content is wrapped in `q ... Q` the first time it
    /// is drawn on, so a graphics state left dirty by the original content
    /// cannot move or recolour the stamp.
    pub fn draw_text(&mut self, index: usize, stamp: &TextStamp<'_>) -> Result<()> {
        let page_id = self.page_id(index)?;
        let origin = self.page(index)?;
        let font_name = stamp.font.font.resource_name();
        self.set_resource(page_id, b"Font", font_name, stamp.font.id)?;

        let mut operations = vec![Operation::new("q", vec![])];

        if let Some(opacity) = stamp.opacity {
            let (state_name, state_id) = self.opacity_state(opacity);
            self.set_resource(page_id, b"ExtGState", &state_name, state_id)?;
            operations.push(Operation::new("gs", vec![Object::Name(state_name.into_bytes())]));
        }

        let (sin, cos) = stamp.rotation_degrees.to_radians().sin_cos();
        operations.extend([
            Operation::new(
                "rg",
                vec![
                    Object::Real(stamp.color.r),
                    Object::Real(stamp.color.g),
                    Object::Real(stamp.color.b),
                ],
            ),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(font_name.as_bytes().to_vec()), Object::Real(stamp.size)],
            ),
            Operation::new(
                "Tm",
                vec![
                    Object::Real(cos),
                    Object::Real(sin),
                    Object::Real(-sin),
                    Object::Real(cos),
                    Object::Real(origin.origin_x + stamp.x),
                    Object::Real(origin.origin_y + stamp.y),
                ],
            ),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(stamp.text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ]);

        let data = Content { operations }.encode().map_err(|err| {
            ExePdfError::EncodeFailure(format!("failed to encode text stamp: {}", err))
        })?;

        self.isolate_existing_content(page_id)?;
        self.append_content(page_id, data)
    }

    // -- Internals ------------------------------------------------------------

    fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.order
            .get(index)
            .copied()
            .ok_or_else(|| ExePdfError::InvalidRange {
                detail: format!("page index {index} is out of range"),
                page_count: self.order.len(),
            })
    }

    fn dictionary(&self, id: ObjectId) -> Result<&Dictionary> {
        self.inner
            .get_object(id)
            .and_then(Object::as_dict)
            .map_err(|err| {
                ExePdfError::DecodeFailure(format!("object {} {} is not a dictionary: {}", id.0, id.1, err))
            })
    }

    fn dictionary_mut(&mut self, id: ObjectId) -> Result<&mut Dictionary> {
        self.inner
            .get_object_mut(id)
            .and_then(Object::as_dict_mut)
            .map_err(|err| {
                ExePdfError::DecodeFailure(format!("object {} {} is not a dictionary: {}", id.0, id.1, err))
            })
    }

    /// Follow references until a direct object is reached.
    fn resolve<'a>(&'a self, value: &'a Object) -> &'a Object {
        let mut current = value;
        for _ in 0..MAX_INDIRECTION {
            match current {
                Object::Reference(id) => match self.inner.get_object(*id) {
                    Ok(target) => current = target,
                    Err(_) => break,
                },
                _ => break,
            }
        }
        current
    }

    fn number_array(&self, value: &Object) -> Option<Vec<f32>> {
        let items = self.resolve(value).as_array().ok()?;
        items
            .iter()
            .map(|item| match self.resolve(item) {
                Object::Integer(n) => Some(*n as f32),
                Object::Real(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    fn rotation_of(&self, page: &Dictionary) -> i64 {
        page.get(b"Rotate")
            .ok()
            .and_then(|value| self.resolve(value).as_i64().ok())
            .unwrap_or(0)
            .rem_euclid(360)
    }

    /// Deep-copy `value` from `source`, following references. `copied` maps
    /// source object ids to ids in this document and is what keeps shared
    /// objects shared and reference cycles finite.
    fn copy_object(
        &mut self,
        source: &Document,
        value: &Object,
        copied: &mut BTreeMap<ObjectId, ObjectId>,
    ) -> Object {
        match value {
            Object::Reference(id) => {
                if let Some(&target) = copied.get(id) {
                    return Object::Reference(target);
                }
                let Ok(referenced) = source.get_object(*id) else {
                    warn!(object = ?id, "Dangling reference dropped during page import");
                    return Object::Null;
                };
                let target = self.inner.new_object_id();
                copied.insert(*id, target);
                let copy = self.copy_object(source, referenced, copied);
                self.inner.objects.insert(target, copy);
                Object::Reference(target)
            }
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy_object(source, item, copied))
                    .collect(),
            ),
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(source, dict, copied)),
            Object::Stream(stream) => {
                let dict = self.copy_dictionary(source, &stream.dict, copied);
                Object::Stream(Stream::new(dict, stream.content.clone()))
            }
            other => other.clone(),
        }
    }

    fn copy_dictionary(
        &mut self,
        source: &Document,
        dict: &Dictionary,
        copied: &mut BTreeMap<ObjectId, ObjectId>,
    ) -> Dictionary {
        // Pages reached indirectly must not drag the source page tree along.
        let is_page = matches!(dict.get(b"Type"), Ok(Object::Name(name)) if name == b"Page");

        let mut copy = Dictionary::new();
        for (key, value) in dict.iter() {
            if is_page && key.as_slice() == b"Parent" {
                continue;
            }
            let value = self.copy_object(source, value, copied);
            copy.set(key.clone(), value);
        }
        copy
    }

    /// Add `name -> target` to a resource category of the page. The page gets
    /// its own copy of the resource dictionaries so shared resources of other
    /// pages are left untouched.
    fn set_resource(&mut self, page_id: ObjectId, category: &[u8], name: &str, target: ObjectId) -> Result<()> {
        let mut resources = self
            .dictionary(page_id)?
            .get(b"Resources")
            .ok()
            .and_then(|value| self.resolve(value).as_dict().ok())
            .cloned()
            .unwrap_or_else(Dictionary::new);

        let mut entries = resources
            .get(category)
            .ok()
            .and_then(|value| self.resolve(value).as_dict().ok())
            .cloned()
            .unwrap_or_else(Dictionary::new);
        entries.set(name, Object::Reference(target));
        resources.set(category, Object::Dictionary(entries));

        self.dictionary_mut(page_id)?
            .set("Resources", Object::Dictionary(resources));
        Ok(())
    }

    fn opacity_state(&mut self, opacity: f32) -> (String, ObjectId) {
        let opacity = opacity.clamp(0.0, 1.0);
        let key = opacity.to_bits();

        let position = match self.opacity_states.iter().position(|(bits, _)| *bits == key) {
            Some(position) => position,
            None => {
                let id = self.inner.add_object(dictionary! {
                    "Type" => "ExtGState",
                    "ca" => Object::Real(opacity),
                    "CA" => Object::Real(opacity),
                });
                self.opacity_states.push((key, id));
                self.opacity_states.len() - 1
            }
        };

        (format!("ExePdfGs{}", position + 1), self.opacity_states[position].1)
    }

    /// Current content streams of the page, as a list of references.
    fn content_list(&mut self, page_id: ObjectId) -> Result<Vec<Object>> {
        let current = self.dictionary(page_id)?.get(b"Contents").ok().cloned();
        let list = match current {
            None | Some(Object::Null) => Vec::new(),
            Some(Object::Array(items)) => items,
            Some(Object::Reference(id)) => match self.inner.get_object(id) {
                Ok(Object::Array(items)) => items.clone(),
                _ => vec![Object::Reference(id)],
            },
            Some(Object::Stream(stream)) => vec![Object::Reference(self.inner.add_object(stream))],
            Some(other) => {
                warn!(value = ?other, "Ignoring malformed page /Contents");
                Vec::new()
            }
        };
        Ok(list)
    }

    fn isolate_existing_content(&mut self, page_id: ObjectId) -> Result<()> {
        if !self.isolated.insert(page_id) {
            return Ok(());
        }

        let mut contents = self.content_list(page_id)?;
        if contents.is_empty() {
            return Ok(());
        }

        let save = self.inner.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let restore = self.inner.add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));
        contents.insert(0, Object::Reference(save));
        contents.push(Object::Reference(restore));

        self.dictionary_mut(page_id)?
            .set("Contents", Object::Array(contents));
        Ok(())
    }

    fn append_content(&mut self, page_id: ObjectId, data: Vec<u8>) -> Result<()> {
        let stream_id = self.inner.add_object(Stream::new(Dictionary::new(), data));
        let mut contents = self.content_list(page_id)?;
        contents.push(Object::Reference(stream_id));

        self.dictionary_mut(page_id)?
            .set("Contents", Object::Array(contents));
        Ok(())
    }
}

/// Copy inherited attributes from the page's ancestors onto the page itself.
fn push_down_inherited(doc: &mut Document, page_id: ObjectId) {
    let Ok(page) = doc.get_object(page_id).and_then(Object::as_dict) else {
        return;
    };

    let mut missing: Vec<&'static [u8]> = INHERITABLE
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut inherited: Vec<(&'static [u8], Object)> = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut visited = HashSet::new();

    while let Some(node_id) = parent {
        if missing.is_empty() || !visited.insert(node_id) {
            break;
        }
        let Ok(node) = doc.get_object(node_id).and_then(Object::as_dict) else {
            break;
        };
        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                inherited.push((*key, value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    if missing.iter().any(|key| *key == b"MediaBox") {
        let media_box = DEFAULT_MEDIA_BOX.iter().map(|n| Object::Real(*n)).collect();
        inherited.push((&b"MediaBox"[..], Object::Array(media_box)));
    }

    if inherited.is_empty() {
        return;
    }
    if let Ok(page) = doc.get_object_mut(page_id).and_then(Object::as_dict_mut) {
        for (key, value) in inherited {
            page.set(key, value);
        }
    }
}

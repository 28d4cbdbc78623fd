// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic inputs for unit tests. Page `i` of a generated PDF has a distinct
// MediaBox width so page order survives every transform observably.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::codec::{DocumentCodec, LopdfCodec};

/// `count` pages, page `i` is `600 + i` points wide and 800 tall.
pub(crate) fn pdf_with_pages(count: usize) -> Vec<u8> {
    let widths: Vec<i64> = (0..count as i64).map(|i| 600 + i).collect();
    pdf_with_widths(&widths)
}

pub(crate) fn pdf_with_widths(widths: &[i64]) -> Vec<u8> {
    let pages: Vec<(i64, i64)> = widths.iter().map(|&width| (width, 0)).collect();
    build(&pages)
}

/// One page per entry with the given `/Rotate`, widths as in
/// [`pdf_with_pages`].
pub(crate) fn pdf_with_rotations(rotations: &[i64]) -> Vec<u8> {
    let pages: Vec<(i64, i64)> = rotations
        .iter()
        .enumerate()
        .map(|(i, &rotation)| (600 + i as i64, rotation))
        .collect();
    build(&pages)
}

fn build(pages: &[(i64, i64)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Courier".to_vec())),
    ]));

    let mut page_ids = Vec::new();
    for (i, &(width, rotation)) in pages.iter().enumerate() {
        let content_id = doc.add_object(page_content(i + 1));
        let mut page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("MediaBox", media_box(width, 800)),
            ("Resources", font_resources(font_id)),
            ("Contents", Object::Reference(content_id)),
        ]);
        if rotation != 0 {
            page.set("Rotate", Object::Integer(rotation));
        }
        page_ids.push(doc.add_object(page));
    }

    let tree = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(page_ids.len() as i64)),
        ("Kids", references(&page_ids)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(tree));

    finish(doc, pages_id)
}

/// `count` pages under an intermediate `/Pages` node. The pages carry no
/// MediaBox, Resources or Rotate of their own: the root supplies a 500x700
/// box and rotation 90, the intermediate node supplies the resources.
pub(crate) fn nested_pdf(count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let root_id = doc.new_object_id();
    let middle_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Courier".to_vec())),
    ]));

    let mut page_ids = Vec::new();
    for i in 0..count {
        let content_id = doc.add_object(page_content(i + 1));
        page_ids.push(doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(middle_id)),
            ("Contents", Object::Reference(content_id)),
        ])));
    }

    doc.objects.insert(
        middle_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Parent", Object::Reference(root_id)),
            ("Count", Object::Integer(count as i64)),
            ("Kids", references(&page_ids)),
            ("Resources", font_resources(font_id)),
        ])),
    );
    doc.objects.insert(
        root_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(count as i64)),
            ("Kids", references(&[middle_id])),
            ("MediaBox", media_box(500, 700)),
            ("Rotate", Object::Integer(90)),
        ])),
    );

    finish(doc, root_id)
}

fn page_content(number: usize) -> Stream {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(24)]),
            Operation::new("Td", vec![Object::Integer(72), Object::Integer(700)]),
            Operation::new(
                "Tj",
                vec![Object::String(
                    format!("Page {}", number).into_bytes(),
                    StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
        ],
    };
    Stream::new(Dictionary::new(), content.encode().unwrap())
}

fn font_resources(font_id: ObjectId) -> Object {
    Object::Dictionary(Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
    )]))
}

fn media_box(width: i64, height: i64) -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(width),
        Object::Integer(height),
    ])
}

fn references(ids: &[ObjectId]) -> Object {
    Object::Array(ids.iter().map(|id| Object::Reference(*id)).collect())
}

fn finish(mut doc: Document, pages_id: ObjectId) -> Vec<u8> {
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

pub(crate) fn png_image(width: u32, height: u32, translucent: bool) -> Vec<u8> {
    let image = if translucent {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 128])))
    } else {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([30, 120, 200])))
    };
    encode_image(&image, ImageFormat::Png)
}

pub(crate) fn jpeg_image(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 160, 60])));
    encode_image(&image, ImageFormat::Jpeg)
}

fn encode_image(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, format).unwrap();
    cursor.into_inner()
}

// ---------------------------------------------------------------------------
// Inspection
// ---------------------------------------------------------------------------

pub(crate) fn page_widths(bytes: &[u8]) -> Vec<f32> {
    let document = LopdfCodec::default().decode(bytes).unwrap();
    document.pages().unwrap().iter().map(|page| page.width).collect()
}

pub(crate) fn page_rotations(bytes: &[u8]) -> Vec<i64> {
    let document = LopdfCodec::default().decode(bytes).unwrap();
    document.pages().unwrap().iter().map(|page| page.rotation).collect()
}

/// Decoded content stream(s) of the page at 0-based `index`.
pub(crate) fn page_text(bytes: &[u8], index: usize) -> String {
    let doc = Document::load_mem(bytes).unwrap();
    let page_id = doc.get_pages()[&(index as u32 + 1)];
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}

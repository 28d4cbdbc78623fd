// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Build a PDF with one page per image.

use exepdf_core::error::{ExePdfError, Result};
use exepdf_core::types::InputFile;
use tracing::{info, instrument, warn};

use crate::codec::DocumentCodec;

/// One page per PNG/JPEG input, each sized to the image in pixels.
///
/// Images that fail to embed are logged and skipped; the call only fails when
/// no image at all could be used.
#[instrument(skip_all, fields(images = images.len()))]
pub fn images_to_pdf(codec: &dyn DocumentCodec, images: &[InputFile]) -> Result<Vec<u8>> {
    if images.is_empty() {
        return Err(ExePdfError::InvalidInput("no images selected".into()));
    }

    let mut document = codec.create();
    let mut skipped = 0usize;

    for image in images {
        let embedded = if image.media_type.is_image() {
            codec.embed_image(&mut document, &image.bytes, &image.media_type)
        } else {
            Err(ExePdfError::DecodeFailure(format!(
                "{} is {}, not a PNG or JPEG image",
                image.name, image.media_type
            )))
        };

        match embedded.and_then(|handle| document.create_image_page(&handle)) {
            Ok(page) => document.append_pages(&[page]),
            Err(err) => {
                skipped += 1;
                warn!(file = %image.name, error = %err, "Skipping image");
            }
        }
    }

    if document.page_count() == 0 {
        return Err(ExePdfError::DecodeFailure(format!(
            "none of the {} images could be decoded",
            images.len()
        )));
    }

    info!(pages = document.page_count(), skipped, "Images converted");
    codec.encode(document, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::LopdfCodec;
    use crate::fixtures;
    use exepdf_core::types::MediaType;

    #[test]
    fn each_image_becomes_a_page() {
        let images = [
            InputFile::new("a.png", MediaType::Png, fixtures::png_image(300, 200, true)),
            InputFile::new("b.jpg", MediaType::Jpeg, fixtures::jpeg_image(50, 70)),
        ];
        let output = images_to_pdf(&LopdfCodec::default(), &images).unwrap();

        let document = LopdfCodec::default().decode(&output).unwrap();
        let sizes: Vec<(f32, f32)> = document
            .pages()
            .unwrap()
            .iter()
            .map(|page| (page.width, page.height))
            .collect();
        assert_eq!(sizes, vec![(300.0, 200.0), (50.0, 70.0)]);
    }

    #[test]
    fn broken_images_are_skipped() {
        let images = [
            InputFile::new("broken.png", MediaType::Png, b"\x89PNG but not really".to_vec()),
            InputFile::new("notes.txt", MediaType::from_mime("text/plain"), b"hello".to_vec()),
            InputFile::new("ok.jpg", MediaType::Jpeg, fixtures::jpeg_image(10, 10)),
        ];
        let output = images_to_pdf(&LopdfCodec::default(), &images).unwrap();
        assert_eq!(fixtures::page_widths(&output), vec![10.0]);
    }

    #[test]
    fn all_broken_is_a_decode_failure() {
        let images = [InputFile::new("broken.jpg", MediaType::Jpeg, b"nope".to_vec())];
        let err = images_to_pdf(&LopdfCodec::default(), &images).unwrap_err();
        assert!(matches!(err, ExePdfError::DecodeFailure(_)));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rotate every page by a signed number of degrees.

use exepdf_core::error::Result;
use tracing::{info, instrument};

use crate::codec::DocumentCodec;

/// `(current + delta) mod 360`, Euclidean, without overflow for any `delta`.
pub fn rotated(current: i64, delta: i64) -> i64 {
    (current.rem_euclid(360) + delta.rem_euclid(360)).rem_euclid(360)
}

#[instrument(skip_all, fields(degrees = degrees))]
pub fn rotate_pages(codec: &dyn DocumentCodec, bytes: &[u8], degrees: i64) -> Result<Vec<u8>> {
    let mut document = codec.decode(bytes)?;

    for index in 0..document.page_count() {
        let current = document.page(index)?.rotation;
        document.set_rotation(index, rotated(current, degrees))?;
    }

    info!(pages = document.page_count(), degrees, "Pages rotated");
    codec.encode(document, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::LopdfCodec;
    use crate::fixtures;

    #[test]
    fn rotation_adds_to_existing() {
        let input = fixtures::pdf_with_rotations(&[0, 90, 270]);
        let output = rotate_pages(&LopdfCodec::default(), &input, 90).unwrap();
        assert_eq!(fixtures::page_rotations(&output), vec![90, 180, 0]);
    }

    #[test]
    fn rotations_compose() {
        let codec = LopdfCodec::default();
        let input = fixtures::pdf_with_rotations(&[0, 180]);

        let twice = rotate_pages(&codec, &rotate_pages(&codec, &input, 90).unwrap(), 90).unwrap();
        let once = rotate_pages(&codec, &input, 180).unwrap();

        assert_eq!(fixtures::page_rotations(&twice), fixtures::page_rotations(&once));
    }

    #[test]
    fn full_turn_is_a_no_op() {
        let input = fixtures::pdf_with_rotations(&[90, 0]);
        let output = rotate_pages(&LopdfCodec::default(), &input, 360).unwrap();
        assert_eq!(fixtures::page_rotations(&output), vec![90, 0]);
    }

    #[test]
    fn negative_and_huge_deltas() {
        assert_eq!(rotated(0, -90), 270);
        assert_eq!(rotated(90, -450), 0);
        assert_eq!(rotated(270, i64::MAX), rotated(270, i64::MAX % 360));
        assert_eq!(rotated(0, i64::MIN), i64::MIN.rem_euclid(360));
    }
}

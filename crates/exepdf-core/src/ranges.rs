// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parsing of free-form page lists typed by the user ("1, 3, 5-7").

use crate::error::{ExePdfError, Result};

/// Largest span a single `a-b` range may expand to.
const MAX_RANGE_SPAN: i64 = 65_536;

/// Parse a page list like `"1, 3, 5-7"` into 1-based page numbers.
///
/// Order and duplicates are preserved; range checking against a real page
/// count happens later, in the operation that consumes the list. Empty
/// segments are ignored.
pub fn parse_page_list(input: &str) -> Result<Vec<i64>> {
    let mut pages = Vec::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let start = parse_number(start)?;
            let end = parse_number(end)?;

            if start > end {
                return Err(ExePdfError::InvalidInput(format!(
                    "range {start}-{end} runs backwards"
                )));
            }
            if end - start >= MAX_RANGE_SPAN {
                return Err(ExePdfError::InvalidInput(format!(
                    "range {start}-{end} is too large"
                )));
            }

            pages.extend(start..=end);
        } else {
            pages.push(parse_number(part)?);
        }
    }

    Ok(pages)
}

fn parse_number(text: &str) -> Result<i64> {
    let text = text.trim();
    text.parse()
        .map_err(|_| ExePdfError::InvalidInput(format!("'{text}' is not a page number")))
}

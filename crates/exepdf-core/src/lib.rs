// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// exepdf — Core types, configuration and error definitions shared across all
// crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod ranges;
pub mod types;

pub use config::{EngineConfig, PageNumberStyle, WatermarkStyle};
pub use error::{ExePdfError, Result};
pub use ranges::parse_page_list;
pub use types::*;

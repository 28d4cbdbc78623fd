// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the collaborator UI.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the front end presents it (re-prompt vs. give up).

use crate::error::ExePdfError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user can fix it by changing a setting (range, password, page list).
    ActionRequired,
    /// The file itself is the problem; retrying with the same file won't help.
    Permanent,
    /// Something went wrong on our side; trying again may work.
    Transient,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert an `ExePdfError` into a `HumanError`.
pub fn humanize_error(err: &ExePdfError) -> HumanError {
    match err {
        ExePdfError::DecodeFailure(detail) => {
            let lower = detail.to_ascii_lowercase();
            if lower.contains("password") || lower.contains("encrypted") {
                HumanError {
                    message: "This file is password protected.".into(),
                    suggestion: "Remove the password with the program that created it, then try again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if lower.contains("image") {
                HumanError {
                    message: "We couldn't read one of your images.".into(),
                    suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
                    severity: Severity::Permanent,
                }
            } else {
                HumanError {
                    message: "There's a problem with this PDF file.".into(),
                    suggestion: "The file may be damaged. Try opening it in a PDF viewer first to check it works, or try a different file.".into(),
                    severity: Severity::Permanent,
                }
            }
        }

        ExePdfError::InvalidRange { page_count, .. } => HumanError {
            message: "Those pages don't exist in this document.".into(),
            suggestion: format!("The document has {page_count} pages. Choose page numbers between 1 and {page_count}."),
            severity: Severity::ActionRequired,
        },

        ExePdfError::DocumentEmpty { .. } => HumanError {
            message: "You can't remove every page.".into(),
            suggestion: "A PDF needs at least one page. Leave at least one page unselected.".into(),
            severity: Severity::ActionRequired,
        },

        ExePdfError::InvalidInput(detail) => HumanError {
            message: "Some information is missing.".into(),
            suggestion: format!("Check the tool settings and try again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        ExePdfError::UnsupportedOperation(tool) => HumanError {
            message: "This tool isn't available yet.".into(),
            suggestion: format!("'{tool}' can't run on this device. Try a different tool."),
            severity: Severity::Permanent,
        },

        ExePdfError::EncodeFailure(_) => HumanError {
            message: "We couldn't save the result.".into(),
            suggestion: "Try again. If this keeps happening, please report it together with the file.".into(),
            severity: Severity::Transient,
        },

        ExePdfError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your storage may be full.".into(),
                    severity: Severity::Transient,
                }
            }
        }

        ExePdfError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Check that the configuration file is valid JSON.".into(),
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_range_mentions_real_page_count() {
        let err = ExePdfError::InvalidRange {
            detail: "start 6 is after end 3".into(),
            page_count: 10,
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("10 pages"));
    }

    #[test]
    fn wrong_password_is_action_required() {
        let err = ExePdfError::DecodeFailure("document is encrypted and needs a password".into());
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }

    #[test]
    fn damaged_pdf_is_permanent() {
        let err = ExePdfError::DecodeFailure("failed to load document #1: invalid file header".into());
        assert_eq!(humanize_error(&err).severity, Severity::Permanent);
    }

    #[test]
    fn removing_everything_is_action_required() {
        let human = humanize_error(&ExePdfError::DocumentEmpty { page_count: 5 });
        assert_eq!(human.severity, Severity::ActionRequired);
    }
}

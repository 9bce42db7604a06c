//! Typed document model for one patent filing.
//!
//! The parser populates these structs field by field; nothing downstream
//! touches the XML again. Every bibliographic field is best-effort: absent
//! data is an empty string or an empty list, never an error.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fully parsed representation of one filing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentModel {
    /// Bibliographic front matter.
    pub metadata: Metadata,
    /// Flattened abstract text, empty if the filing has none.
    pub abstract_text: String,
    /// Description content in document order.
    pub description: Vec<Paragraph>,
    /// Claims in document order.
    pub claims: Vec<Claim>,
    /// Drawing manifest in document order (not sorted by figure number).
    pub drawings: Vec<Drawing>,
}

/// Bibliographic metadata of a filing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Publication document number.
    pub publication_number: String,
    /// Kind code, e.g. `A1`.
    pub kind_code: String,
    /// Publication date, formatted `MM/DD/YYYY` when the source was a valid
    /// 8-digit date, raw otherwise.
    pub publication_date: String,
    /// Application document number.
    pub application_number: String,
    /// Filing date, same formatting rule as `publication_date`.
    pub filing_date: String,
    /// Invention title.
    pub title: String,
    /// Applicant: organization name, or `first last` for an individual,
    /// or empty.
    pub applicant: String,
    /// Applicant location, `City, ST (US)` from whichever parts exist.
    pub applicant_location: String,
    /// Inventors in document order.
    pub inventors: Vec<Inventor>,
    /// Claimed provisional applications, zero or more.
    pub provisionals: Vec<Provisional>,
    /// IPC classification codes.
    pub ipc_classes: Vec<String>,
    /// CPC classification codes.
    pub cpc_classes: Vec<String>,
}

/// One inventor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventor {
    /// `first last`, whichever parts exist.
    pub name: String,
    /// `City, ST (US)`, whichever parts exist.
    pub location: String,
}

/// One provisional application the filing claims priority from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provisional {
    /// Provisional application number.
    pub number: String,
    /// Filing date of the provisional, formatted like other dates.
    pub date: String,
}

/// One element of the description, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Paragraph {
    /// A section heading.
    Heading {
        /// Flattened heading text.
        text: String,
    },
    /// A body paragraph.
    Body {
        /// Source paragraph number, possibly empty.
        number: String,
        /// Flattened paragraph text.
        text: String,
    },
}

/// One claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Source claim number; expected but not guaranteed contiguous from 1.
    pub number: String,
    /// Flattened claim text including any nested claim-text markup.
    pub text: String,
}

/// One entry of the drawing manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drawing {
    /// Figure number as it appears in the manifest, e.g. `00001`.
    pub figure_number: String,
    /// Drawing file resolved against the schema file's directory.
    pub source_file: PathBuf,
}

impl Drawing {
    /// Whether this drawing carries the title-page sentinel figure number
    /// (all zeros). At most one such drawing is expected per filing; it is
    /// rendered on the title page instead of the drawings section.
    #[must_use]
    pub fn is_title_figure(&self) -> bool {
        !self.figure_number.is_empty() && self.figure_number.bytes().all(|b| b == b'0')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_figure_numbers_are_the_title_sentinel() {
        for num in ["00000", "0", "000"] {
            let drawing = Drawing {
                figure_number: num.to_string(),
                source_file: PathBuf::new(),
            };
            assert!(drawing.is_title_figure(), "figure {num:?}");
        }
    }

    #[test]
    fn ordinary_figure_numbers_are_not_the_sentinel() {
        for num in ["", "1", "10", "00001", "D00000"] {
            let drawing = Drawing {
                figure_number: num.to_string(),
                source_file: PathBuf::new(),
            };
            assert!(!drawing.is_title_figure(), "figure {num:?}");
        }
    }

    #[test]
    fn model_round_trips_through_json() {
        let model = DocumentModel {
            metadata: Metadata {
                publication_number: "20160148332".into(),
                title: "DRIVE UNIT".into(),
                inventors: vec![Inventor {
                    name: "Jane Doe".into(),
                    location: "Austin, TX (US)".into(),
                }],
                ..Metadata::default()
            },
            abstract_text: "A drive unit.".into(),
            description: vec![
                Paragraph::Heading {
                    text: "FIELD".into(),
                },
                Paragraph::Body {
                    number: "0001".into(),
                    text: "The present disclosure relates to drive units.".into(),
                },
            ],
            claims: vec![Claim {
                number: "1".into(),
                text: "1. A drive unit comprising a motor.".into(),
            }],
            drawings: vec![],
        };

        let json = serde_json::to_string(&model).unwrap();
        let back: DocumentModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }
}

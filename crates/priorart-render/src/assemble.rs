//! Document assembly.
//!
//! A pure layout pass over the parsed model and the already-converted
//! image set. Section order is fixed: title page, one page per drawing,
//! description, claims. Nothing here parses or touches the filesystem;
//! the only output is the serialized PDF.

use crate::image::RenderedImage;
use crate::page::{PageWriter, Style};
use priorart_core::{Claim, DocumentModel, Drawing, Metadata, Paragraph, Result};

/// Title-page drawing slot, 4 x 3 inches.
const TITLE_IMAGE_MAX: (f32, f32) = (288.0, 216.0);
/// Full drawing-page slot, 6.5 x 8.5 inches.
const FIGURE_IMAGE_MAX: (f32, f32) = (468.0, 612.0);

/// Lay the model out into a single paginated PDF.
///
/// `images` must be index-aligned with `model.drawings`; `None` marks a
/// drawing whose conversion failed, which is omitted entirely. At most one
/// drawing carries the title-page sentinel figure number; if a malformed
/// filing has several, the first in document order goes on the title page
/// and the rest stay in the drawings section.
///
/// # Errors
///
/// Returns [`priorart_core::ReconstructError::DocumentWrite`] if the PDF
/// cannot be serialized.
pub fn assemble_document(
    model: &DocumentModel,
    mut images: Vec<Option<RenderedImage>>,
) -> Result<Vec<u8>> {
    images.resize_with(model.drawings.len(), || None);

    let title_index = model.drawings.iter().position(Drawing::is_title_figure);
    let title_image = title_index.and_then(|i| images[i].take());

    let mut writer = PageWriter::new();
    title_page(&mut writer, model, title_image);
    drawings_section(&mut writer, model, &mut images, title_index);
    description_section(&mut writer, model);
    claims_section(&mut writer, &model.claims);
    writer.finish(&model.metadata.title)
}

fn title_page(writer: &mut PageWriter, model: &DocumentModel, title_image: Option<RenderedImage>) {
    let meta = &model.metadata;

    writer.paragraph("United States", &Style::HEADING);
    writer.paragraph("Patent Application Publication", &Style::BANNER);
    writer.spacer(12.0);

    writer.paragraph(
        &format!(
            "Pub. No.: US {} {}",
            meta.publication_number, meta.kind_code
        ),
        &Style::META,
    );
    writer.paragraph(
        &format!("Pub. Date: {}", meta.publication_date),
        &Style::META,
    );
    writer.spacer(20.0);

    writer.paragraph(
        &format!("(54) {}", meta.title.to_uppercase()),
        &Style::HEADING,
    );
    writer.spacer(12.0);

    writer.paragraph(
        &format!("(71) Applicant: {}", name_with_location(&meta.applicant, &meta.applicant_location)),
        &Style::META,
    );
    writer.paragraph(
        &format!("(72) Inventors: {}", inventor_list(meta)),
        &Style::META,
    );
    writer.spacer(6.0);

    writer.paragraph(
        &format!("(21) Appl. No.: {}", meta.application_number),
        &Style::META,
    );
    writer.paragraph(&format!("(22) Filed: {}", meta.filing_date), &Style::META);

    if !meta.provisionals.is_empty() {
        writer.spacer(6.0);
        writer.paragraph("Related U.S. Application Data", &Style::META_BOLD);
        for provisional in &meta.provisionals {
            writer.paragraph(
                &format!(
                    "(60) Provisional application No. {}, filed on {}.",
                    provisional.number, provisional.date
                ),
                &Style::META,
            );
        }
    }

    if !meta.ipc_classes.is_empty() || !meta.cpc_classes.is_empty() {
        writer.spacer(6.0);
        writer.paragraph("Publication Classification", &Style::META_BOLD);
        if !meta.ipc_classes.is_empty() {
            writer.paragraph(
                &format!("(51) Int. Cl.: {}", meta.ipc_classes.join(", ")),
                &Style::META,
            );
        }
        if !meta.cpc_classes.is_empty() {
            writer.paragraph(
                &format!("(52) U.S. Cl. CPC: {}", meta.cpc_classes.join(", ")),
                &Style::META,
            );
        }
    }

    writer.spacer(20.0);
    writer.paragraph("(57) ABSTRACT", &Style::HEADING);
    writer.spacer(6.0);
    if !model.abstract_text.is_empty() {
        writer.paragraph(&model.abstract_text, &Style::BODY);
    }

    if let Some(image) = title_image {
        writer.spacer(12.0);
        writer.image(image, TITLE_IMAGE_MAX.0, TITLE_IMAGE_MAX.1);
    }

    writer.page_break();
}

/// One page per drawing, document order, excluding the title-page drawing.
/// A drawing whose conversion failed is absent entirely, caption included.
fn drawings_section(
    writer: &mut PageWriter,
    model: &DocumentModel,
    images: &mut [Option<RenderedImage>],
    title_index: Option<usize>,
) {
    for (i, drawing) in model.drawings.iter().enumerate() {
        if Some(i) == title_index {
            continue;
        }
        let Some(image) = images[i].take() else {
            continue;
        };

        writer.paragraph(&figure_caption(&drawing.figure_number), &Style::HEADING);
        writer.spacer(12.0);
        writer.image(image, FIGURE_IMAGE_MAX.0, FIGURE_IMAGE_MAX.1);
        writer.page_break();
    }
}

fn description_section(writer: &mut PageWriter, model: &DocumentModel) {
    writer.paragraph("DETAILED DESCRIPTION", &Style::HEADING);
    writer.spacer(12.0);

    for paragraph in &model.description {
        match paragraph {
            Paragraph::Heading { text } => {
                writer.spacer(12.0);
                writer.paragraph(text, &Style::SUBHEADING);
                writer.spacer(6.0);
            }
            Paragraph::Body { number, text } => {
                let rendered = match paragraph_prefix(number) {
                    Some(prefix) => format!("{prefix} {text}"),
                    None => text.clone(),
                };
                writer.paragraph(&rendered, &Style::BODY);
                writer.spacer(6.0);
            }
        }
    }

    writer.page_break();
}

fn claims_section(writer: &mut PageWriter, claims: &[Claim]) {
    writer.paragraph("CLAIMS", &Style::HEADING);
    writer.spacer(12.0);
    writer.paragraph("What is claimed is:", &Style::BODY);
    writer.spacer(12.0);

    for claim in claims {
        let number = display_number(&claim.number);
        // Flattened claim markup usually already repeats the number; only
        // prefix it when it does not.
        let text = if claim.text.starts_with(&number) {
            claim.text.clone()
        } else {
            format!("{number}. {}", claim.text)
        };
        writer.paragraph(&text, &Style::CLAIM);
        writer.spacer(8.0);
    }
}

fn name_with_location(name: &str, location: &str) -> String {
    match (name.is_empty(), location.is_empty()) {
        (false, false) => format!("{name}, {location}"),
        (false, true) => name.to_string(),
        (true, _) => location.to_string(),
    }
}

fn inventor_list(meta: &Metadata) -> String {
    meta.inventors
        .iter()
        .map(|inventor| name_with_location(&inventor.name, &inventor.location))
        .collect::<Vec<_>>()
        .join("; ")
}

/// `FIG. N` with the figure number rendered as an integer when numeric
/// (`00001` prints as `1`), verbatim otherwise.
fn figure_caption(figure_number: &str) -> String {
    match figure_number.parse::<u64>() {
        Ok(n) => format!("FIG. {n}"),
        Err(_) => format!("FIG. {figure_number}"),
    }
}

/// Four-digit bracketed paragraph number when purely numeric, raw in
/// brackets otherwise, nothing when unnumbered.
fn paragraph_prefix(number: &str) -> Option<String> {
    if number.is_empty() {
        return None;
    }
    match number.parse::<u64>() {
        Ok(n) => Some(format!("[{n:04}]")),
        Err(_) => Some(format!("[{number}]")),
    }
}

fn display_number(number: &str) -> String {
    match number.parse::<u64>() {
        Ok(n) => n.to_string(),
        Err(_) => number.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Document;
    use priorart_core::{Inventor, Provisional};
    use std::path::PathBuf;

    fn test_image() -> RenderedImage {
        RenderedImage {
            width: 4,
            height: 4,
            rgb: vec![128; 48],
        }
    }

    fn drawing(num: &str) -> Drawing {
        Drawing {
            figure_number: num.to_string(),
            source_file: PathBuf::from(format!("D{num}.TIF")),
        }
    }

    fn base_model() -> DocumentModel {
        DocumentModel {
            metadata: Metadata {
                publication_number: "20160148332".into(),
                kind_code: "A1".into(),
                publication_date: "05/26/2016".into(),
                application_number: "14947765".into(),
                filing_date: "11/20/2015".into(),
                title: "Drive Unit".into(),
                applicant: "Acme Motors LLC".into(),
                applicant_location: "Austin, TX (US)".into(),
                inventors: vec![Inventor {
                    name: "Jane Doe".into(),
                    location: "Austin, TX (US)".into(),
                }],
                provisionals: vec![],
                ipc_classes: vec!["B60K 1/02".into()],
                cpc_classes: vec!["B60K 17".into()],
            },
            abstract_text: "A drive unit with a compact motor arrangement.".into(),
            description: vec![
                Paragraph::Heading {
                    text: "TECHNICAL FIELD".into(),
                },
                Paragraph::Body {
                    number: "0001".into(),
                    text: "This disclosure relates to drive units.".into(),
                },
                Paragraph::Body {
                    number: "0002".into(),
                    text: "Further background follows.".into(),
                },
            ],
            claims: vec![
                Claim {
                    number: "00001".into(),
                    text: "1. A drive unit comprising a motor.".into(),
                },
                Claim {
                    number: "00002".into(),
                    text: "The drive unit of claim 1, wherein the motor is electric.".into(),
                },
            ],
            drawings: vec![],
        }
    }

    fn page_texts(bytes: &[u8]) -> Vec<String> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let content = doc.get_page_content(page_id).unwrap();
                // Drop the writer's escaping of parentheses inside string
                // literals so assertions can match plain text.
                String::from_utf8_lossy(&content).replace('\\', "")
            })
            .collect()
    }

    #[test]
    fn minimal_model_produces_three_pages() {
        // Title page, description, claims; no drawings.
        let bytes = assemble_document(&base_model(), vec![]).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn title_page_carries_banner_metadata_and_classifications() {
        let bytes = assemble_document(&base_model(), vec![]).unwrap();
        let pages = page_texts(&bytes);
        let title = &pages[0];
        assert!(title.contains("Patent Application Publication"));
        assert!(title.contains("(54) DRIVE UNIT"));
        assert!(title.contains("(72) Inventors: Jane Doe, Austin, TX (US)"));
        assert!(title.contains("(51) Int. Cl.: B60K 1/02"));
        assert!(title.contains("(52) U.S. Cl. CPC: B60K 17"));
        assert!(title.contains("(57) ABSTRACT"));
    }

    #[test]
    fn provisional_lines_render_only_when_present() {
        let bytes = assemble_document(&base_model(), vec![]).unwrap();
        assert!(!page_texts(&bytes)[0].contains("Provisional application"));

        let mut model = base_model();
        model.metadata.provisionals = vec![Provisional {
            number: "62082999".into(),
            date: "11/21/2014".into(),
        }];
        let bytes = assemble_document(&model, vec![]).unwrap();
        assert!(page_texts(&bytes)[0]
            .contains("(60) Provisional application No. 62082999, filed on 11/21/2014."));
    }

    #[test]
    fn title_sentinel_drawing_stays_on_the_title_page() {
        let mut model = base_model();
        model.drawings = vec![drawing("00000"), drawing("00001")];
        let bytes =
            assemble_document(&model, vec![Some(test_image()), Some(test_image())]).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        // Title page + one drawing page + description + claims.
        assert_eq!(doc.get_pages().len(), 4);

        let pages = page_texts(&bytes);
        assert!(pages[0].contains("Im0"), "title page embeds the sentinel drawing");
        assert!(pages[1].contains("FIG. 1"));
        assert!(!pages[1].contains("FIG. 0"));
    }

    #[test]
    fn title_sentinel_without_other_drawings_adds_no_drawing_page() {
        let mut model = base_model();
        model.drawings = vec![drawing("00000")];
        let bytes = assemble_document(&model, vec![Some(test_image())]).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn drawings_keep_document_order_not_figure_order() {
        let mut model = base_model();
        model.drawings = vec![drawing("00002"), drawing("00001")];
        let bytes =
            assemble_document(&model, vec![Some(test_image()), Some(test_image())]).unwrap();

        let pages = page_texts(&bytes);
        assert!(pages[1].contains("FIG. 2"));
        assert!(pages[2].contains("FIG. 1"));
    }

    #[test]
    fn failed_drawing_is_absent_but_everything_else_survives() {
        let mut model = base_model();
        model.drawings = vec![drawing("00001"), drawing("00002")];
        let bytes = assemble_document(&model, vec![None, Some(test_image())]).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 4);
        let pages = page_texts(&bytes);
        assert!(!pages.iter().any(|p| p.contains("FIG. 1")));
        assert!(pages[1].contains("FIG. 2"));
        assert!(pages.iter().any(|p| p.contains("What is claimed is:")));
    }

    #[test]
    fn description_paragraphs_get_four_digit_prefixes() {
        let bytes = assemble_document(&base_model(), vec![]).unwrap();
        let pages = page_texts(&bytes);
        let description = &pages[1];
        assert!(description.contains("DETAILED DESCRIPTION"));
        assert!(description.contains("[0001] This disclosure relates to drive units."));
        assert!(description.contains("TECHNICAL FIELD"));
    }

    #[test]
    fn unnumbered_and_non_numeric_paragraphs() {
        assert_eq!(paragraph_prefix(""), None);
        assert_eq!(paragraph_prefix("14"), Some("[0014]".to_string()));
        assert_eq!(paragraph_prefix("A7"), Some("[A7]".to_string()));
    }

    #[test]
    fn claims_are_numbered_once() {
        let bytes = assemble_document(&base_model(), vec![]).unwrap();
        let pages = page_texts(&bytes);
        let claims = &pages[2];
        assert!(claims.contains("What is claimed is:"));
        // Claim 1's flattened text already starts with its number.
        assert!(claims.contains("1. A drive unit comprising a motor."));
        assert!(!claims.contains("1. 1. A drive unit"));
        // Claim 2's does not, so the number is prefixed.
        assert!(claims.contains("2. The drive unit of claim 1"));
    }

    #[test]
    fn figure_captions_render_numeric_and_verbatim() {
        assert_eq!(figure_caption("00003"), "FIG. 3");
        assert_eq!(figure_caption("D1"), "FIG. D1");
    }
}

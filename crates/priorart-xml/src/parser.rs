//! Schema parsing.
//!
//! USPTO application-publication XML is a fixed but intricate hierarchy:
//! reference blocks for the publication and application, party blocks for
//! applicants and inventors, two independent classification schemes, an
//! abstract, a description mixing headings with numbered paragraphs, claims
//! with arbitrarily nested inline markup, and a drawings manifest naming
//! external image files. Each consumed element gets its own extraction
//! function over the parsed tree; a malformed file is the only fatal
//! condition, every missing field degrades to an empty value.

use log::debug;
use priorart_core::{
    format_archive_date, Claim, DocumentModel, Drawing, Inventor, Metadata, Paragraph, Provisional,
    ReconstructError, Result,
};
use roxmltree::{Document, Node, ParsingOptions};
use std::path::Path;

/// Parse a schema file into the typed document model.
///
/// Drawing file references resolve against the schema file's directory.
///
/// # Errors
///
/// Returns [`ReconstructError::SchemaParseError`] when the file is not
/// well-formed XML, or [`ReconstructError::Io`] when it cannot be read.
pub fn parse_schema_file(path: &Path) -> Result<DocumentModel> {
    let xml = std::fs::read_to_string(path)?;
    parse_schema_str(&xml, path)
}

/// Parse schema XML already held in memory.
///
/// `schema_path` supplies error context and the directory drawing
/// references resolve against.
///
/// # Errors
///
/// Returns [`ReconstructError::SchemaParseError`] when the text is not
/// well-formed XML.
pub fn parse_schema_str(xml: &str, schema_path: &Path) -> Result<DocumentModel> {
    // Bulk files carry a DOCTYPE; allow the declaration without resolving
    // external entities.
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options).map_err(|e| {
        ReconstructError::SchemaParseError {
            path: schema_path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    let root = doc.root_element();
    let base_dir = schema_path.parent().unwrap_or_else(|| Path::new(""));

    Ok(DocumentModel {
        metadata: extract_metadata(root),
        abstract_text: extract_abstract(root),
        description: extract_description(root),
        claims: extract_claims(root),
        drawings: extract_drawings(root, base_dir),
    })
}

/// Concatenate every nested text node and collapse whitespace runs to
/// single spaces. Body and claim text routinely wrap words in inline
/// markup; the flattened form is what renders.
fn flatten_text(node: Node) -> String {
    let mut raw = String::new();
    for descendant in node.descendants() {
        if descendant.is_text() {
            if let Some(text) = descendant.text() {
                raw.push_str(text);
            }
        }
    }
    collapse_whitespace(&raw)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn first_descendant<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.is_element() && n.has_tag_name(tag))
}

/// Flattened text of the first descendant with the given tag, or empty.
fn descendant_text(node: Node, tag: &str) -> String {
    first_descendant(node, tag)
        .map(flatten_text)
        .unwrap_or_default()
}

fn join_nonempty(parts: &[&str], separator: &str) -> String {
    parts
        .iter()
        .copied()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

fn extract_metadata(root: Node) -> Metadata {
    let mut metadata = Metadata::default();

    if let Some(publication) = first_descendant(root, "publication-reference") {
        metadata.publication_number = descendant_text(publication, "doc-number");
        metadata.kind_code = descendant_text(publication, "kind");
        metadata.publication_date = format_archive_date(&descendant_text(publication, "date"));
    }
    if let Some(application) = first_descendant(root, "application-reference") {
        metadata.application_number = descendant_text(application, "doc-number");
        metadata.filing_date = format_archive_date(&descendant_text(application, "date"));
    }

    metadata.title = descendant_text(root, "invention-title");

    if let Some(applicants) = first_descendant(root, "us-applicants") {
        metadata.applicant = applicant_name(applicants);
        metadata.applicant_location = location_of(applicants);
    }

    metadata.inventors = root
        .descendants()
        .filter(|n| n.has_tag_name("inventor"))
        .map(|n| Inventor {
            name: person_name(n),
            location: location_of(n),
        })
        .collect();

    metadata.provisionals = root
        .descendants()
        .filter(|n| n.has_tag_name("us-provisional-application"))
        .map(|n| Provisional {
            number: descendant_text(n, "doc-number"),
            date: format_archive_date(&descendant_text(n, "date")),
        })
        .filter(|p| !p.number.is_empty())
        .collect();

    metadata.ipc_classes = classification_codes(root, "classification-ipcr");
    metadata.cpc_classes = classification_codes(root, "classification-cpc");

    metadata
}

/// Organization name if present, otherwise the individual's name,
/// otherwise empty. Applicant absence never aborts reconstruction.
fn applicant_name(applicants: Node) -> String {
    let org = descendant_text(applicants, "orgname");
    if org.is_empty() {
        person_name(applicants)
    } else {
        org
    }
}

fn person_name(node: Node) -> String {
    let first = descendant_text(node, "first-name");
    let last = descendant_text(node, "last-name");
    join_nonempty(&[&first, &last], " ")
}

/// `City, ST (US)` from whichever address parts exist.
fn location_of(node: Node) -> String {
    let city = descendant_text(node, "city");
    let state = descendant_text(node, "state");
    let country = descendant_text(node, "country");

    let mut location = join_nonempty(&[&city, &state], ", ");
    if !country.is_empty() {
        if location.is_empty() {
            location = format!("({country})");
        } else {
            location.push_str(&format!(" ({country})"));
        }
    }
    location
}

fn classification_codes(root: Node, tag: &str) -> Vec<String> {
    root.descendants()
        .filter(|n| n.has_tag_name(tag))
        .filter_map(classification_code)
        .collect()
}

/// Reassemble one classification entry from its discrete sub-fields.
///
/// Section, class, and subclass are required; an entry missing any of them
/// is skipped since classification is supplementary metadata. The group
/// part is omitted entirely when there is no main group, and the subgroup
/// separator is omitted when there is no subgroup.
fn classification_code(node: Node) -> Option<String> {
    let section = descendant_text(node, "section");
    let class = descendant_text(node, "class");
    let subclass = descendant_text(node, "subclass");
    if section.is_empty() || class.is_empty() || subclass.is_empty() {
        debug!("skipping classification entry with incomplete section/class/subclass");
        return None;
    }

    let main_group = descendant_text(node, "main-group");
    let subgroup = descendant_text(node, "subgroup");

    let mut code = format!("{section}{class}{subclass}");
    if !main_group.is_empty() {
        code.push(' ');
        code.push_str(&main_group);
        if !subgroup.is_empty() {
            code.push('/');
            code.push_str(&subgroup);
        }
    }
    Some(code)
}

fn extract_abstract(root: Node) -> String {
    first_descendant(root, "abstract")
        .map(flatten_text)
        .unwrap_or_default()
}

/// Description content in document order: headings and numbered body
/// paragraphs interleave, and the order is significant.
fn extract_description(root: Node) -> Vec<Paragraph> {
    let Some(description) = first_descendant(root, "description") else {
        return Vec::new();
    };

    let mut paragraphs = Vec::new();
    for child in description.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "heading" => {
                let text = flatten_text(child);
                if !text.is_empty() {
                    paragraphs.push(Paragraph::Heading { text });
                }
            }
            "p" => {
                let text = flatten_text(child);
                if !text.is_empty() {
                    paragraphs.push(Paragraph::Body {
                        number: child.attribute("num").unwrap_or_default().to_string(),
                        text,
                    });
                }
            }
            _ => {}
        }
    }
    paragraphs
}

fn extract_claims(root: Node) -> Vec<Claim> {
    let Some(claims) = first_descendant(root, "claims") else {
        return Vec::new();
    };

    claims
        .descendants()
        .filter(|n| n.has_tag_name("claim"))
        .map(|claim| Claim {
            number: claim.attribute("num").unwrap_or_default().to_string(),
            text: flatten_text(claim),
        })
        .collect()
}

/// Drawing manifest in document order. Figures without an image file
/// reference are skipped; file existence is not checked here — a missing
/// file surfaces later as a skipped drawing, not a parse failure.
fn extract_drawings(root: Node, base_dir: &Path) -> Vec<Drawing> {
    let Some(drawings) = first_descendant(root, "drawings") else {
        return Vec::new();
    };

    let mut manifest = Vec::new();
    for figure in drawings.descendants().filter(|n| n.has_tag_name("figure")) {
        let Some(img) = first_descendant(figure, "img") else {
            continue;
        };
        let Some(file) = img.attribute("file").filter(|f| !f.is_empty()) else {
            continue;
        };
        manifest.push(Drawing {
            figure_number: figure.attribute("num").unwrap_or_default().to_string(),
            source_file: base_dir.join(file),
        });
    }
    manifest
}

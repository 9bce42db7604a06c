//! Paginated PDF writing.
//!
//! A small layout engine over `lopdf`: US-letter pages, a cursor moving
//! down from the top margin, greedy word wrap with estimated Helvetica
//! glyph widths, and images embedded as flate-compressed raw-RGB XObjects.
//! Pages accumulate as operation lists; the whole `lopdf::Document` is
//! built once in [`PageWriter::finish`].

use crate::image::RenderedImage;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use priorart_core::{ReconstructError, Result};
use std::io::Write;

/// US letter page size in points.
pub(crate) const PAGE_WIDTH: f32 = 612.0;
pub(crate) const PAGE_HEIGHT: f32 = 792.0;
/// 0.75 inch margins all around.
pub(crate) const MARGIN: f32 = 54.0;
const TEXT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const PAGE_TOP: f32 = PAGE_HEIGHT - MARGIN;

/// Average Helvetica glyph width as a fraction of the font size. Patent
/// text is plain prose, so a flat estimate wraps close enough to real
/// metrics.
const GLYPH_WIDTH_FACTOR: f32 = 0.5;

/// A text style preset.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Style {
    pub size: f32,
    pub leading: f32,
    pub bold: bool,
    pub centered: bool,
    /// Extra indent of the first line.
    pub first_indent: f32,
    /// Extra indent of continuation lines.
    pub rest_indent: f32,
}

impl Style {
    /// Document-type banner on the title page.
    pub(crate) const BANNER: Style = Style {
        size: 16.0,
        leading: 20.0,
        bold: true,
        centered: true,
        first_indent: 0.0,
        rest_indent: 0.0,
    };
    /// Centered section heading.
    pub(crate) const HEADING: Style = Style {
        size: 12.0,
        leading: 16.0,
        bold: true,
        centered: true,
        first_indent: 0.0,
        rest_indent: 0.0,
    };
    /// Left-aligned sub-heading inside the description.
    pub(crate) const SUBHEADING: Style = Style {
        size: 11.0,
        leading: 15.0,
        bold: true,
        centered: false,
        first_indent: 0.0,
        rest_indent: 0.0,
    };
    /// Bibliographic line on the title page.
    pub(crate) const META: Style = Style {
        size: 9.0,
        leading: 12.0,
        bold: false,
        centered: false,
        first_indent: 0.0,
        rest_indent: 0.0,
    };
    /// Bold variant for title-page group headers.
    pub(crate) const META_BOLD: Style = Style {
        size: 9.0,
        leading: 12.0,
        bold: true,
        centered: false,
        first_indent: 0.0,
        rest_indent: 0.0,
    };
    /// Description body paragraph with a first-line indent.
    pub(crate) const BODY: Style = Style {
        size: 10.0,
        leading: 14.0,
        bold: false,
        centered: false,
        first_indent: 20.0,
        rest_indent: 0.0,
    };
    /// Claim paragraph with a hanging indent.
    pub(crate) const CLAIM: Style = Style {
        size: 10.0,
        leading: 14.0,
        bold: false,
        centered: false,
        first_indent: 0.0,
        rest_indent: 20.0,
    };
}

#[derive(Default)]
struct Page {
    operations: Vec<Operation>,
    images: Vec<RenderedImage>,
}

/// Accumulates pages of text and images, then serializes them as one PDF.
pub(crate) struct PageWriter {
    pages: Vec<Page>,
    current: Page,
    cursor: f32,
}

impl PageWriter {
    pub(crate) fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Page::default(),
            cursor: PAGE_TOP,
        }
    }

    /// Write a wrapped paragraph in the given style, breaking pages as
    /// needed.
    pub(crate) fn paragraph(&mut self, text: &str, style: &Style) {
        for (i, line) in wrap(text, style).iter().enumerate() {
            let indent = if i == 0 {
                style.first_indent
            } else {
                style.rest_indent
            };
            self.line(line, style, indent);
        }
    }

    /// Vertical gap; never triggers a page break by itself.
    pub(crate) fn spacer(&mut self, points: f32) {
        self.cursor -= points;
    }

    /// Finish the current page. A no-op on a page with no content yet, so
    /// consecutive breaks never emit blank pages.
    pub(crate) fn page_break(&mut self) {
        if self.current.operations.is_empty() {
            self.cursor = PAGE_TOP;
            return;
        }
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor = PAGE_TOP;
    }

    /// Draw an image scaled (aspect preserved) into a `max_width` x
    /// `max_height` slot, horizontally centered at the cursor.
    pub(crate) fn image(&mut self, image: RenderedImage, max_width: f32, max_height: f32) {
        let scale = (max_width / image.width as f32).min(max_height / image.height as f32);
        let width = image.width as f32 * scale;
        let height = image.height as f32 * scale;

        self.ensure_room(height);
        self.cursor -= height;
        let x = MARGIN + (TEXT_WIDTH - width) / 2.0;
        let name = format!("Im{}", self.current.images.len());

        self.current.operations.push(Operation::new("q", vec![]));
        self.current.operations.push(Operation::new(
            "cm",
            vec![
                width.into(),
                0.0_f32.into(),
                0.0_f32.into(),
                height.into(),
                x.into(),
                self.cursor.into(),
            ],
        ));
        self.current
            .operations
            .push(Operation::new("Do", vec![name.as_str().into()]));
        self.current.operations.push(Operation::new("Q", vec![]));
        self.current.images.push(image);
    }

    /// Build the PDF and serialize it.
    ///
    /// # Errors
    ///
    /// Returns [`ReconstructError::DocumentWrite`] if content encoding or
    /// document serialization fails.
    pub(crate) fn finish(mut self, document_title: &str) -> Result<Vec<u8>> {
        self.page_break();
        let mut pages = self.pages;
        if pages.is_empty() {
            pages.push(Page::default());
        }

        let write_err = |e: lopdf::Error| ReconstructError::DocumentWrite(e.to_string());

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular_font = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_font = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });

        let mut kids = Vec::new();
        for page in pages {
            let Page { operations, images } = page;
            let encoded = Content { operations }.encode().map_err(write_err)?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

            let mut xobjects = lopdf::Dictionary::new();
            for (i, image) in images.into_iter().enumerate() {
                let stream = image_xobject(&image)?;
                let image_id = doc.add_object(stream);
                xobjects.set(format!("Im{i}"), Object::Reference(image_id));
            }
            let mut resources = dictionary! {
                "Font" => dictionary! {
                    "F1" => Object::Reference(regular_font),
                    "F2" => Object::Reference(bold_font),
                },
            };
            if !xobjects.is_empty() {
                resources.set("XObject", Object::Dictionary(xobjects));
            }

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "Contents" => Object::Reference(content_id),
                "Resources" => Object::Dictionary(resources),
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    PAGE_WIDTH.into(),
                    PAGE_HEIGHT.into(),
                ],
            });
            kids.push(Object::Reference(page_id));
        }

        let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(encode_text(document_title), StringFormat::Literal),
            "Producer" => Object::String(
                encode_text(concat!("priorart ", env!("CARGO_PKG_VERSION"))),
                StringFormat::Literal,
            ),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e: std::io::Error| ReconstructError::DocumentWrite(e.to_string()))?;
        Ok(buffer)
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.cursor - needed < MARGIN {
            self.page_break();
        }
    }

    fn line(&mut self, text: &str, style: &Style, indent: f32) {
        self.ensure_room(style.leading);
        self.cursor -= style.leading;

        let x = if style.centered {
            let estimated = estimate_width(text, style.size);
            MARGIN + ((TEXT_WIDTH - estimated) / 2.0).max(0.0)
        } else {
            MARGIN + indent
        };
        let font = if style.bold { "F2" } else { "F1" };

        let ops = &mut self.current.operations;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![font.into(), style.size.into()]));
        ops.push(Operation::new("Td", vec![x.into(), self.cursor.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_text(text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
}

/// Build an image XObject from raw RGB samples.
fn image_xobject(image: &RenderedImage) -> Result<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&image.rgb)
        .and_then(|()| encoder.finish())
        .map_err(|e| ReconstructError::DocumentWrite(e.to_string()))
        .map(|compressed| {
            Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(image.width),
                    "Height" => i64::from(image.height),
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "FlateDecode",
                },
                compressed,
            )
        })
}

/// Encode text for a WinAnsi-encoded core font. Characters outside the
/// 8-bit range degrade to close ASCII equivalents or `?`.
fn encode_text(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' => bytes.push(b'\''),
            '\u{201C}' | '\u{201D}' => bytes.push(b'"'),
            '\u{2013}' | '\u{2014}' => bytes.push(b'-'),
            '\u{00A0}' => bytes.push(b' '),
            _ => {
                let code = u32::from(c);
                if code <= 0xFF {
                    bytes.push(code as u8);
                } else {
                    bytes.push(b'?');
                }
            }
        }
    }
    bytes
}

fn estimate_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_WIDTH_FACTOR
}

fn char_limit(usable: f32, size: f32) -> usize {
    ((usable / (size * GLYPH_WIDTH_FACTOR)) as usize).max(1)
}

/// Greedy word wrap against estimated widths. Words longer than a whole
/// line are hard-split so nothing escapes the margin by more than the
/// estimate error.
fn wrap(text: &str, style: &Style) -> Vec<String> {
    let limit_first = char_limit(TEXT_WIDTH - style.first_indent, style.size);
    let limit_rest = char_limit(TEXT_WIDTH - style.rest_indent, style.size);

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        for piece in split_word(word, limit_rest) {
            let limit = if lines.is_empty() {
                limit_first
            } else {
                limit_rest
            };
            if current.is_empty() {
                current = piece;
            } else if current.chars().count() + 1 + piece.chars().count() <= limit {
                current.push(' ');
                current.push_str(&piece);
            } else {
                lines.push(std::mem::take(&mut current));
                current = piece;
            }
        }
    }
    lines.push(current);
    lines
}

fn split_word(word: &str, limit: usize) -> Vec<String> {
    if word.chars().count() <= limit {
        return vec![word.to_string()];
    }
    word.chars()
        .collect::<Vec<_>>()
        .chunks(limit)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

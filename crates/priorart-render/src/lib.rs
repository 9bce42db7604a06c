//! Drawing conversion and paginated PDF assembly.
//!
//! Two stages live here. [`convert_drawings`] decodes each TIFF drawing
//! and normalizes it to 8-bit RGB, skipping (with a warning) any file that
//! fails to decode. [`assemble_document`] is a pure layout function over
//! the parsed [`DocumentModel`](priorart_core::DocumentModel) and the
//! converted image set, producing the final PDF byte buffer: title page
//! with the reserved drawing slot, one page per remaining figure,
//! four-digit numbered description paragraphs, and numbered claims.

pub mod assemble;
pub mod image;
mod page;

pub use assemble::assemble_document;
pub use image::{convert_drawing, convert_drawings, RenderedImage};

//! USPTO application-publication schema parsing.
//!
//! Turns one extracted schema file into the typed
//! [`DocumentModel`](priorart_core::DocumentModel) the assembler consumes.
//! Parsing is DOM-based: a filing is bounded by a single patent, so the
//! whole tree fits comfortably in memory and tree walking keeps the
//! per-element extraction functions independently testable.

pub mod parser;

pub use parser::{parse_schema_file, parse_schema_str};

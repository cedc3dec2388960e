//! Word-list table PDF generator
//!
//! Reads a JSON resource of Danish word lists (verbs, nouns, adjectives)
//! and renders each list as a paginated landscape table PDF: repeated
//! header row, running page title, page number and attribution footer,
//! and `<b>…</b>` bold spans inside cells.

pub mod config;
pub mod decor;
pub mod fonts;
pub mod generator;
pub mod markup;
pub mod paginate;
pub mod resource;
pub mod table;

// Re-export the types a caller needs for one run.
pub use config::GeneratorConfig;
pub use fonts::FontContext;
pub use generator::PdfTableGenerator;
pub use markup::{resolve_markup, StyledRun};
pub use paginate::{paginate, PageBlock};
pub use resource::{DataResource, WordList};

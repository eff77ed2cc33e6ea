//! Structural PPTX export for ZenSlide decks.
//!
//! Each template field becomes an editable text shape placed from the
//! structural layout table. The package is assembled in memory.

pub mod exporter;
pub mod package;
pub mod parser;
pub mod slide;

pub use exporter::PptxExporter;
pub use parser::{ParsedShape, ParsedSlide, PptxParser};

//! Rasterizing PDF export for ZenSlide decks.
//!
//! Every slide is rendered read-only, drawn into one reused capture target
//! at 2× and embedded as a JPEG page of a 1280×720 document.

pub mod capture;
pub mod document;
pub mod exporter;

pub use capture::{capture_svg, CaptureTarget};
pub use document::{count_pages, write_document, PageImage};
pub use exporter::{load_fonts, PdfExporter};

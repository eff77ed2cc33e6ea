//! Error types for the slide editor core.

use crate::export::Capability;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing, rendering or exporting a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// The template id is not part of the fixed catalog.
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// The theme id is not part of the fixed catalog.
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// Attempted to delete the last remaining slide.
    #[error("A deck must keep at least one slide")]
    DeckUnderflow,

    /// A slide index outside the deck.
    #[error("Slide index {index} out of range for a deck of {len}")]
    SlideOutOfRange { index: usize, len: usize },

    /// An export needed a capability that has not finished loading.
    #[error("Export library not ready: {0}")]
    LibraryNotReady(Capability),

    /// An export was requested while another one was running.
    #[error("An export is already in progress")]
    ExportInProgress,

    /// Capture, assembly or write failure during export.
    #[error("Export failed: {0}")]
    ExportFailure(String),

    /// Failed to write an output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML writing or parsing error (for PPTX and SVG capture).
    #[error("XML error: {0}")]
    Xml(String),

    /// Rasterization of a capture target failed.
    #[error("Rasterization error: {0}")]
    Raster(String),

    /// Image encoding failed.
    #[error("Image encoding error: {0}")]
    Image(String),
}

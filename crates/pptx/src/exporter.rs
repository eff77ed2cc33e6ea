//! Structural PowerPoint export.

use crate::package::build_package;
use crate::slide::slide_xml;
use zenslide_core::{Capability, ExportFormat, Exporter, Result, SlideStore};

const REQUIRES: [Capability; 1] = [Capability::PresentationDocument];

/// Exports a deck as one editable text shape per template field.
#[derive(Debug, Default)]
pub struct PptxExporter;

impl PptxExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for PptxExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pptx
    }

    fn requires(&self) -> &[Capability] {
        &REQUIRES
    }

    fn export(&mut self, store: &SlideStore) -> Result<Vec<u8>> {
        let palette = store.theme().export_palette();
        let slides = store
            .slides()
            .iter()
            .map(|slide| slide_xml(slide, &palette))
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "Writing {} slides with {} palette",
            slides.len(),
            store.theme().id
        );
        build_package(&slides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::PptxParser;
    use std::io::Cursor;

    fn deck() -> SlideStore {
        let mut store = SlideStore::new();
        store.create_slide("BULLETS").unwrap();
        store.update_field(1, "title", "Agenda").unwrap();
        store.update_field(1, "body", "Uno\nDos").unwrap();
        store.create_slide("QUOTE").unwrap();
        store.update_field(2, "quote", "Menos es más").unwrap();
        store.create_slide("BIG_NUMBER").unwrap();
        store
    }

    #[test]
    fn test_export_reads_back_in_order() {
        let store = deck();
        let bytes = PptxExporter::new().export(&store).unwrap();
        let slides = PptxParser::new().parse(Cursor::new(bytes)).unwrap();

        assert_eq!(slides.len(), 4);
        assert_eq!(slides[0].texts(), vec!["Bienvenidos a ZenSlide", "La forma minimalista de presentar"]);
        assert_eq!(slides[1].texts(), vec!["Agenda", "Uno\nDos"]);
        assert_eq!(slides[2].texts(), vec!["\"Menos es más\"", "-"]);
        assert_eq!(slides[3].texts(), vec!["0", ""]);
    }

    #[test]
    fn test_background_follows_theme_tone() {
        let mut store = deck();
        let bytes = PptxExporter::new().export(&store).unwrap();
        let slides = PptxParser::new().parse(Cursor::new(bytes)).unwrap();
        assert!(slides.iter().all(|s| s.background.as_deref() == Some("ffffff")));

        store.set_theme("dark").unwrap();
        let bytes = PptxExporter::new().export(&store).unwrap();
        let slides = PptxParser::new().parse(Cursor::new(bytes)).unwrap();
        assert!(slides.iter().all(|s| s.background.as_deref() == Some("1e293b")));
    }

    #[test]
    fn test_requires_presentation_library() {
        let exporter = PptxExporter::new();
        assert_eq!(exporter.format(), ExportFormat::Pptx);
        assert_eq!(exporter.requires(), &[Capability::PresentationDocument]);
    }
}

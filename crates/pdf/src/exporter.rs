//! Rasterizing PDF export.

use crate::capture::CaptureTarget;
use crate::document::{write_document, PageImage};
use resvg::usvg::fontdb;
use std::path::Path;
use std::sync::Arc;
use zenslide_core::export::PAGE_SIZE;
use zenslide_core::{
    render_at, Capability, Error, ExportFormat, Exporter, RenderMode, Result, SlideStore,
};

const REQUIRES: [Capability; 2] = [Capability::Rasterizer, Capability::PagedDocument];

/// Load the font database used to draw slide text.
///
/// System fonts plus any `extra_dirs`. A database with no faces is a failed
/// load, since every capture would come out without text.
pub fn load_fonts<P: AsRef<Path>>(extra_dirs: &[P]) -> Result<Arc<fontdb::Database>> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    for dir in extra_dirs {
        db.load_fonts_dir(dir);
    }

    if db.len() == 0 {
        return Err(Error::Raster("No usable font faces found".into()));
    }

    // Generic families default to names that may not be installed.
    let probe = |family: fontdb::Family<'_>| {
        db.query(&fontdb::Query {
            families: &[family],
            ..Default::default()
        })
        .is_some()
    };
    let missing_sans = !probe(fontdb::Family::SansSerif);
    let missing_serif = !probe(fontdb::Family::Serif);
    let fallback = db
        .faces()
        .next()
        .and_then(|face| face.families.first())
        .map(|(name, _)| name.clone());
    if let Some(name) = fallback {
        if missing_sans {
            log::debug!("Using '{}' for sans-serif text", name);
            db.set_sans_serif_family(name.clone());
        }
        if missing_serif {
            log::debug!("Using '{}' for serif text", name);
            db.set_serif_family(name);
        }
    }

    log::info!("Loaded {} font faces", db.len());
    Ok(Arc::new(db))
}

/// Captures every slide read-only and assembles one page per slide.
pub struct PdfExporter {
    target: CaptureTarget,
}

impl PdfExporter {
    pub fn new(fontdb: Arc<fontdb::Database>) -> Result<Self> {
        let (width, height) = PAGE_SIZE;
        Ok(Self {
            target: CaptureTarget::new(fontdb, width, height)?,
        })
    }
}

impl Exporter for PdfExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn requires(&self) -> &[Capability] {
        &REQUIRES
    }

    fn export(&mut self, store: &SlideStore) -> Result<Vec<u8>> {
        let (width, height) = self.target.size();
        let mut pages = Vec::with_capacity(store.len());

        for index in 0..store.len() {
            let view = render_at(store, index, RenderMode::ReadOnly).ok_or(
                Error::SlideOutOfRange {
                    index,
                    len: store.len(),
                },
            )?;
            // Any failed capture aborts the whole document.
            let jpeg = self.target.capture(&view)?;
            pages.push(PageImage {
                jpeg,
                width,
                height,
            });
        }

        write_document(&pages, PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::count_pages;

    /// The JPEG payload of every image XObject, in file order.
    fn embedded_images(pdf: &[u8]) -> Vec<&[u8]> {
        const KEY: &[u8] = b"/Filter /DCTDecode /Length ";
        const OPEN: &[u8] = b" >>\nstream\n";
        let mut images = Vec::new();
        let mut at = 0;
        while let Some(found) = pdf[at..].windows(KEY.len()).position(|w| w == KEY) {
            let digits = at + found + KEY.len();
            let end = digits + pdf[digits..].iter().take_while(|b| b.is_ascii_digit()).count();
            let len: usize = std::str::from_utf8(&pdf[digits..end]).unwrap().parse().unwrap();
            assert_eq!(&pdf[end..end + OPEN.len()], OPEN);
            let start = end + OPEN.len();
            images.push(&pdf[start..start + len]);
            at = start + len;
        }
        images
    }

    fn exporter() -> PdfExporter {
        PdfExporter::new(Arc::new(fontdb::Database::new())).unwrap()
    }

    #[test]
    fn test_one_page_per_slide() {
        let mut store = SlideStore::new();
        store.create_slide("BULLETS").unwrap();
        store.create_slide("TWO_COL").unwrap();
        store.update_field(2, "col1", "Izquierda").unwrap();

        let pdf = exporter().export(&store).unwrap();
        assert_eq!(count_pages(&pdf), 3);
        assert!(pdf.windows(3).any(|w| w == [0xFF, 0xD8, 0xFF]));
    }

    #[test]
    fn test_pages_follow_deck_order() {
        let mut store = SlideStore::new();
        store.create_slide("BULLETS").unwrap();
        store.update_field(1, "title", "Agenda").unwrap();
        store.create_slide("BULLETS").unwrap();
        store
            .update_field(2, "title", "palabra ".repeat(30).trim())
            .unwrap();

        let pdf = exporter().export(&store).unwrap();
        let pages = embedded_images(&pdf);
        assert_eq!(pages.len(), store.len());

        let mut target = CaptureTarget::new(Arc::new(fontdb::Database::new()), 1280, 720).unwrap();
        for (index, page) in pages.iter().enumerate() {
            let view = render_at(&store, index, RenderMode::ReadOnly).unwrap();
            assert_eq!(*page, target.capture(&view).unwrap().as_slice(), "page {}", index + 1);
        }
        assert_ne!(pages[0], pages[1]);
        assert_ne!(pages[1], pages[2]);
        assert_ne!(pages[0], pages[2]);
    }

    #[test]
    fn test_capture_target_is_reused() {
        let store = SlideStore::new();
        let mut exporter = exporter();
        let first = exporter.export(&store).unwrap();
        let second = exporter.export(&store).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_requirements() {
        let exporter = exporter();
        assert_eq!(exporter.format(), ExportFormat::Pdf);
        assert_eq!(
            exporter.requires(),
            &[Capability::Rasterizer, Capability::PagedDocument]
        );
    }
}

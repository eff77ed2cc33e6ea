//! Capture target: read-only slide view → SVG → pixels → JPEG.

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use quick_xml::escape::escape;
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use std::fmt::Write as _;
use std::sync::Arc;
use zenslide_core::export::RASTER_SCALE;
use zenslide_core::layout::wrap_lines;
use zenslide_core::render::FieldView;
use zenslide_core::template::Align;
use zenslide_core::{Error, Result, SlideView};

const SANS: &str = "Helvetica, Arial, sans-serif";
const SERIF: &str = "Georgia, serif";
const RULE_COLOR: &str = "f3f4f6";
/// Full quality; pages are captured for sharpness, not size.
pub const JPEG_QUALITY: u8 = 100;

/// Baseline of line `line` inside a field, from its top edge.
fn baseline(field: &FieldView, line: usize) -> f32 {
    let style = &field.style;
    let line_box = style.font_size * style.line_height;
    field.bounds.y + line as f32 * line_box + line_box / 2.0 + style.font_size * 0.35
}

fn write_field(svg: &mut String, field: &FieldView) {
    let style = &field.style;
    let bounds = &field.bounds;

    if style.rule_below {
        let _ = write!(
            svg,
            r##"<rect x="{}" y="{}" width="{}" height="2" fill="#{}"/>"##,
            bounds.x,
            bounds.bottom() - 2.0,
            bounds.width,
            RULE_COLOR
        );
    }

    // Hints are prompts for the author, never part of the artifact.
    if field.text.is_empty() {
        return;
    }

    let (anchor, x) = match style.align {
        Align::Left => ("start", bounds.x),
        Align::Center => ("middle", bounds.x + bounds.width / 2.0),
        Align::Right => ("end", bounds.x + bounds.width),
    };
    let _ = write!(
        svg,
        r##"<g font-family="{}" font-size="{}" font-weight="{}" font-style="{}" fill="#{}" text-anchor="{}">"##,
        if style.serif { SERIF } else { SANS },
        style.font_size,
        style.weight,
        if style.italic { "italic" } else { "normal" },
        field.color,
        anchor,
    );
    for (i, line) in wrap_lines(&field.text, bounds.width, style).iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" xml:space="preserve">{}</text>"#,
            x,
            baseline(field, i),
            escape(line.as_str())
        );
    }
    svg.push_str("</g>");
}

/// SVG document for one read-only view, in canvas units.
pub fn capture_svg(view: &SlideView) -> String {
    let mut svg = String::with_capacity(2048);
    let _ = write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><rect width="{w}" height="{h}" fill="#{bg}"/>"##,
        w = view.width,
        h = view.height,
        bg = view.background,
    );

    for field in &view.fields {
        write_field(&mut svg, field);
    }

    let _ = write!(
        svg,
        r##"<text x="{}" y="{}" font-family="{}" font-size="14" fill="#{}" opacity="{}" text-anchor="end">{}</text>"##,
        view.width - 24.0,
        view.height - 20.0,
        SANS,
        view.text_color,
        view.page.opacity,
        escape(view.page.label.as_str())
    );
    svg.push_str("</svg>");
    svg
}

/// The single off-screen target slides are drawn into, one at a time.
///
/// Holding it by `&mut` keeps captures sequential: the pixels of one slide
/// are encoded before the next slide is drawn.
pub struct CaptureTarget {
    options: usvg::Options<'static>,
    pixmap: Pixmap,
    scale: f32,
}

impl CaptureTarget {
    /// A target for `width`×`height` canvases, oversampled by [`RASTER_SCALE`].
    pub fn new(fontdb: Arc<fontdb::Database>, width: u32, height: u32) -> Result<Self> {
        let scale = RASTER_SCALE;
        let (pw, ph) = (
            (width as f32 * scale).round() as u32,
            (height as f32 * scale).round() as u32,
        );
        let pixmap = Pixmap::new(pw, ph)
            .ok_or_else(|| Error::Raster(format!("Cannot allocate {}x{} capture target", pw, ph)))?;

        let mut options = usvg::Options::default();
        options.fontdb = fontdb;

        Ok(Self {
            options,
            pixmap,
            scale,
        })
    }

    /// Pixel size of captured images.
    pub fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    /// Draw `view` and return it as a JPEG.
    pub fn capture(&mut self, view: &SlideView) -> Result<Vec<u8>> {
        let svg = capture_svg(view);
        let tree = usvg::Tree::from_str(&svg, &self.options)
            .map_err(|e| Error::Raster(format!("Failed to parse capture of slide {}: {}", view.slide, e)))?;

        self.pixmap.fill(Color::WHITE);
        resvg::render(
            &tree,
            Transform::from_scale(self.scale, self.scale),
            &mut self.pixmap.as_mut(),
        );

        let (width, height) = self.size();
        let rgb: Vec<u8> = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue()]
            })
            .collect();
        let image = RgbImage::from_raw(width, height, rgb)
            .ok_or_else(|| Error::Image("Capture buffer has the wrong size".into()))?;

        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
            .encode_image(&image)
            .map_err(|e| Error::Image(format!("Failed to encode image: {}", e)))?;

        log::debug!("Captured slide {} ({} bytes)", view.slide, buffer.len());
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zenslide_core::{render_at, RenderMode, SlideStore};

    fn read_only(store: &SlideStore, index: usize) -> SlideView {
        render_at(store, index, RenderMode::ReadOnly).unwrap()
    }

    #[test]
    fn test_svg_carries_text_and_background() {
        let mut store = SlideStore::new();
        store.update_field(0, "title", "A & B").unwrap();
        let svg = capture_svg(&read_only(&store, 0));

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r##"fill="#ffffff""##));
        assert!(svg.contains("A &amp; B"));
        assert!(svg.contains("ZenSlide • 1"));
        assert!(svg.contains(r#"text-anchor="middle""#));
    }

    #[test]
    fn test_svg_omits_hints() {
        let mut store = SlideStore::new();
        store.create_slide("BIG_NUMBER").unwrap();
        let view = read_only(&store, 1);
        let svg = capture_svg(&view);

        for field in &view.fields {
            let hint = field.hint.as_ref().unwrap();
            assert!(!svg.contains(hint.text), "{}", hint.text);
        }
    }

    #[test]
    fn test_capture_produces_oversampled_jpeg() {
        let store = SlideStore::new();
        let mut target = CaptureTarget::new(Arc::new(fontdb::Database::new()), 1280, 720).unwrap();
        assert_eq!(target.size(), (2560, 1440));

        let jpeg = target.capture(&read_only(&store, 0)).unwrap();
        assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);

        let decoded =
            image::load_from_memory_with_format(&jpeg, image::ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (2560, 1440));
    }

    #[test]
    fn test_capture_encodes_at_full_quality() {
        let store = SlideStore::new();
        let mut target = CaptureTarget::new(Arc::new(fontdb::Database::new()), 1280, 720).unwrap();
        let jpeg = target.capture(&read_only(&store, 0)).unwrap();

        // First quantization table: marker, 2 length bytes, table id, 64 entries.
        let dqt = jpeg.windows(2).position(|w| w == [0xFF, 0xDB]).unwrap();
        let table = &jpeg[dqt + 5..dqt + 5 + 64];
        assert!(table.iter().all(|&q| q == 1), "{:?}", table);
    }
}

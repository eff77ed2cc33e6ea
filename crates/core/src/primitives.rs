//! Structural layout table for shape-based exports.
//!
//! Each template registers one pure function that turns a slide into
//! positioned text primitives on a 10 in × 5.625 in (16:9) page. The
//! exporter iterates this table generically; tests check it against the
//! template catalog so the two cannot drift apart.

use crate::template::{Align, TemplateId};
use crate::theme::ExportPalette;
use crate::types::Slide;

/// Page width in inches.
pub const PAGE_WIDTH_IN: f64 = 10.0;
/// Page height in inches.
pub const PAGE_HEIGHT_IN: f64 = 5.625;

/// Gray used for secondary text.
const SECONDARY: &str = "888888";
/// Indigo used for the big number.
const ACCENT: &str = "4f46e5";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Plain text box; newlines become paragraphs.
    TextBox,
    /// Text box whose paragraphs are bulleted.
    BulletList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InkColor {
    /// The palette foreground.
    Foreground,
    /// A fixed `rrggbb` color.
    Fixed(&'static str),
}

impl InkColor {
    pub fn resolve(&self, palette: &ExportPalette) -> &'static str {
        match self {
            Self::Foreground => palette.foreground,
            Self::Fixed(hex) => hex,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size_pt: f64,
    pub bold: bool,
    pub italic: bool,
    pub align: Align,
    pub color: InkColor,
}

impl TextStyle {
    const fn new(font_size_pt: f64) -> Self {
        Self {
            font_size_pt,
            bold: false,
            italic: false,
            align: Align::Left,
            color: InkColor::Foreground,
        }
    }

    const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    const fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    const fn color(mut self, hex: &'static str) -> Self {
        self.color = InkColor::Fixed(hex);
        self
    }
}

/// One positioned piece of text. Geometry is in inches.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    /// The template field this primitive shows.
    pub field: &'static str,
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
    pub style: TextStyle,
}

/// Builds the primitives of one slide.
pub type LayoutFn = fn(&Slide) -> Vec<Primitive>;

/// A table entry.
pub struct StructuralLayout {
    pub template: TemplateId,
    pub build: LayoutFn,
}

/// Authored value or a fixed default. Never the on-screen placeholder.
fn text_or(slide: &Slide, key: &str, default: &str) -> String {
    slide.value(key).unwrap_or(default).to_string()
}

fn text(
    field: &'static str,
    kind: ShapeKind,
    (x, y): (f64, f64),
    (width, height): (f64, f64),
    text: String,
    style: TextStyle,
) -> Primitive {
    Primitive {
        field,
        kind,
        x,
        y,
        width,
        height,
        text,
        style,
    }
}

fn title_layout(slide: &Slide) -> Vec<Primitive> {
    vec![
        text(
            "title",
            ShapeKind::TextBox,
            (0.5, 2.0),
            (9.0, 1.0),
            text_or(slide, "title", "Título"),
            TextStyle::new(44.0).bold().align(Align::Center),
        ),
        text(
            "subtitle",
            ShapeKind::TextBox,
            (0.5, 3.5),
            (9.0, 0.75),
            text_or(slide, "subtitle", ""),
            TextStyle::new(24.0).align(Align::Center).color(SECONDARY),
        ),
    ]
}

fn bullets_layout(slide: &Slide) -> Vec<Primitive> {
    vec![
        text(
            "title",
            ShapeKind::TextBox,
            (0.5, 0.5),
            (9.0, 0.8),
            text_or(slide, "title", "Título"),
            TextStyle::new(32.0).bold(),
        ),
        text(
            "body",
            ShapeKind::BulletList,
            (0.5, 1.5),
            (9.0, PAGE_HEIGHT_IN * 0.7),
            text_or(slide, "body", ""),
            TextStyle::new(18.0),
        ),
    ]
}

fn two_col_layout(slide: &Slide) -> Vec<Primitive> {
    let height = PAGE_HEIGHT_IN * 0.8;
    vec![
        text(
            "col1",
            ShapeKind::TextBox,
            (0.5, 1.0),
            (4.5, height),
            text_or(slide, "col1", ""),
            TextStyle::new(18.0),
        ),
        text(
            "col2",
            ShapeKind::TextBox,
            (5.0, 1.0),
            (4.5, height),
            text_or(slide, "col2", ""),
            TextStyle::new(18.0),
        ),
    ]
}

fn quote_layout(slide: &Slide) -> Vec<Primitive> {
    vec![
        text(
            "quote",
            ShapeKind::TextBox,
            (1.0, 2.0),
            (8.0, 1.5),
            format!("\"{}\"", text_or(slide, "quote", "")),
            TextStyle::new(36.0).italic().align(Align::Center),
        ),
        text(
            "author",
            ShapeKind::TextBox,
            (1.0, 4.0),
            (8.0, 0.6),
            format!("- {}", text_or(slide, "author", "")),
            TextStyle::new(20.0).align(Align::Right).color(SECONDARY),
        ),
    ]
}

fn big_number_layout(slide: &Slide) -> Vec<Primitive> {
    vec![
        text(
            "number",
            ShapeKind::TextBox,
            (0.0, 1.5),
            (PAGE_WIDTH_IN, 2.0),
            text_or(slide, "number", "0"),
            TextStyle::new(120.0).bold().align(Align::Center).color(ACCENT),
        ),
        text(
            "label",
            ShapeKind::TextBox,
            (0.0, 4.0),
            (PAGE_WIDTH_IN, 0.8),
            text_or(slide, "label", ""),
            TextStyle::new(24.0).align(Align::Center).color(SECONDARY),
        ),
    ]
}

static TABLE: [StructuralLayout; 5] = [
    StructuralLayout {
        template: TemplateId::Title,
        build: title_layout,
    },
    StructuralLayout {
        template: TemplateId::Bullets,
        build: bullets_layout,
    },
    StructuralLayout {
        template: TemplateId::TwoCol,
        build: two_col_layout,
    },
    StructuralLayout {
        template: TemplateId::Quote,
        build: quote_layout,
    },
    StructuralLayout {
        template: TemplateId::BigNumber,
        build: big_number_layout,
    },
];

/// The registered layout for a template.
pub fn layout_for(template: TemplateId) -> &'static StructuralLayout {
    &TABLE[template as usize]
}

/// Primitives for `slide`, in template field order.
pub fn primitives(slide: &Slide) -> Vec<Primitive> {
    (layout_for(slide.template).build)(slide)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::list_all;
    use crate::types::SlideId;

    #[test]
    fn test_table_covers_catalog_fields_in_order() {
        for template in list_all() {
            let entry = layout_for(template.id);
            assert_eq!(entry.template, template.id);

            let slide = Slide::new(SlideId(1), template.id);
            let keys: Vec<&str> = primitives(&slide).iter().map(|p| p.field).collect();
            assert_eq!(keys, template.field_keys(), "{}", template.id);
        }
    }

    #[test]
    fn test_primitives_stay_on_page() {
        for template in list_all() {
            let slide = Slide::new(SlideId(1), template.id);
            for p in primitives(&slide) {
                assert!(p.x >= 0.0 && p.y >= 0.0);
                assert!(p.x + p.width <= PAGE_WIDTH_IN + 1e-9, "{}", p.field);
                assert!(p.y + p.height <= PAGE_HEIGHT_IN + 1e-9, "{}", p.field);
            }
        }
    }

    #[test]
    fn test_defaults_never_use_placeholders() {
        for template in list_all() {
            let slide = Slide::new(SlideId(1), template.id);
            for (p, spec) in primitives(&slide).iter().zip(template.fields) {
                assert_ne!(p.text, spec.placeholder, "{}", p.field);
            }
        }

        let slide = Slide::new(SlideId(1), TemplateId::Title);
        assert_eq!(primitives(&slide)[0].text, "Título");
        let slide = Slide::new(SlideId(1), TemplateId::BigNumber);
        assert_eq!(primitives(&slide)[0].text, "0");
    }

    #[test]
    fn test_quote_decoration() {
        let mut slide = Slide::new(SlideId(1), TemplateId::Quote);
        slide.content.insert("quote".into(), "Menos es más".into());
        slide.content.insert("author".into(), "Mies".into());
        let texts: Vec<String> = primitives(&slide).into_iter().map(|p| p.text).collect();
        assert_eq!(texts, vec!["\"Menos es más\"", "- Mies"]);
    }

    #[test]
    fn test_ink_resolution() {
        let palette = crate::theme::Theme::lookup("dark").unwrap().export_palette();
        assert_eq!(InkColor::Foreground.resolve(&palette), "ffffff");
        assert_eq!(InkColor::Fixed("888888").resolve(&palette), "888888");
    }
}

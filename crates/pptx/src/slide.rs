//! Slide XML generation from structural primitives.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zenslide_core::primitives::{self, Primitive, ShapeKind};
use zenslide_core::template::Align;
use zenslide_core::theme::ExportPalette;
use zenslide_core::{Error, Result, Slide};

/// English Metric Units per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Convert inches to EMUs.
pub fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

fn align_attr(align: Align) -> &'static str {
    match align {
        Align::Left => "l",
        Align::Center => "ctr",
        Align::Right => "r",
    }
}

/// Thin event writer that maps quick-xml errors into ours.
pub(crate) struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    pub(crate) fn new() -> Result<Self> {
        let mut out = Self {
            writer: Writer::new(Vec::with_capacity(4096)),
        };
        out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(out)
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::Xml(format!("Failed to write slide XML: {}", e)))
    }

    pub(crate) fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Start(start))
    }

    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Empty(start))
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    pub(crate) fn text(&mut self, text: &str) -> Result<()> {
        self.event(Event::Text(BytesText::new(text)))
    }

    fn solid_fill(&mut self, hex: &str) -> Result<()> {
        self.start("a:solidFill", &[])?;
        self.empty("a:srgbClr", &[("val", hex)])?;
        self.end("a:solidFill")
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

/// Write one text shape.
fn write_shape(
    xml: &mut XmlOut,
    shape_id: u32,
    primitive: &Primitive,
    palette: &ExportPalette,
) -> Result<()> {
    let id = shape_id.to_string();
    let name = format!("{} {}", primitive.field, shape_id);

    xml.start("p:sp", &[])?;
    xml.start("p:nvSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", id.as_str()), ("name", name.as_str())])?;
    xml.empty("p:cNvSpPr", &[("txBox", "1")])?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvSpPr")?;

    let (x, y) = (emu(primitive.x).to_string(), emu(primitive.y).to_string());
    let (cx, cy) = (
        emu(primitive.width).to_string(),
        emu(primitive.height).to_string(),
    );
    xml.start("p:spPr", &[])?;
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
    xml.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    xml.end("a:xfrm")?;
    xml.start("a:prstGeom", &[("prst", "rect")])?;
    xml.empty("a:avLst", &[])?;
    xml.end("a:prstGeom")?;
    xml.empty("a:noFill", &[])?;
    xml.end("p:spPr")?;

    xml.start("p:txBody", &[])?;
    xml.start("a:bodyPr", &[("wrap", "square"), ("rtlCol", "0")])?;
    xml.empty("a:normAutofit", &[])?;
    xml.end("a:bodyPr")?;
    xml.empty("a:lstStyle", &[])?;

    let style = &primitive.style;
    let size = ((style.font_size_pt * 100.0).round() as u32).to_string();
    let color = style.color.resolve(palette);
    let mut run_attrs: Vec<(&str, &str)> = vec![("lang", "es-ES"), ("sz", size.as_str())];
    if style.bold {
        run_attrs.push(("b", "1"));
    }
    if style.italic {
        run_attrs.push(("i", "1"));
    }
    run_attrs.push(("dirty", "0"));

    for line in primitive.text.split('\n') {
        xml.start("a:p", &[])?;
        match primitive.kind {
            ShapeKind::BulletList if !line.trim().is_empty() => {
                xml.start(
                    "a:pPr",
                    &[
                        ("marL", "342900"),
                        ("indent", "-342900"),
                        ("algn", align_attr(style.align)),
                    ],
                )?;
                xml.empty("a:buFont", &[("typeface", "Arial")])?;
                xml.empty("a:buChar", &[("char", "•")])?;
                xml.end("a:pPr")?;
            }
            _ => {
                xml.start("a:pPr", &[("algn", align_attr(style.align))])?;
                xml.empty("a:buNone", &[])?;
                xml.end("a:pPr")?;
            }
        }

        if line.is_empty() {
            xml.start("a:endParaRPr", &run_attrs)?;
            xml.solid_fill(color)?;
            xml.end("a:endParaRPr")?;
        } else {
            xml.start("a:r", &[])?;
            xml.start("a:rPr", &run_attrs)?;
            xml.solid_fill(color)?;
            xml.end("a:rPr")?;
            xml.start("a:t", &[])?;
            xml.text(line)?;
            xml.end("a:t")?;
            xml.end("a:r")?;
        }
        xml.end("a:p")?;
    }

    xml.end("p:txBody")?;
    xml.end("p:sp")
}

/// Generate `ppt/slides/slideN.xml` for one slide.
pub fn slide_xml(slide: &Slide, palette: &ExportPalette) -> Result<Vec<u8>> {
    let mut xml = XmlOut::new()?;
    xml.start("p:sld", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;
    xml.start("p:cSld", &[])?;

    // Background must come before the shape tree.
    xml.start("p:bg", &[])?;
    xml.start("p:bgPr", &[])?;
    xml.solid_fill(palette.background)?;
    xml.empty("a:effectLst", &[])?;
    xml.end("p:bgPr")?;
    xml.end("p:bg")?;

    xml.start("p:spTree", &[])?;
    xml.start("p:nvGrpSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    xml.empty("p:cNvGrpSpPr", &[])?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvGrpSpPr")?;
    xml.start("p:grpSpPr", &[])?;
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    xml.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    xml.end("a:xfrm")?;
    xml.end("p:grpSpPr")?;

    for (i, primitive) in primitives::primitives(slide).iter().enumerate() {
        write_shape(&mut xml, i as u32 + 2, primitive, palette)?;
    }

    xml.end("p:spTree")?;
    xml.end("p:cSld")?;
    xml.start("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.end("p:clrMapOvr")?;
    xml.end("p:sld")?;

    Ok(xml.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use zenslide_core::{SlideId, TemplateId, Theme};

    fn xml_of(slide: &Slide, theme: &str) -> String {
        let palette = Theme::lookup(theme).unwrap().export_palette();
        String::from_utf8(slide_xml(slide, &palette).unwrap()).unwrap()
    }

    #[test]
    fn test_emu() {
        assert_eq!(emu(1.0), 914_400);
        assert_eq!(emu(10.0), 9_144_000);
        assert_eq!(emu(5.625), 5_143_500);
    }

    #[test]
    fn test_title_slide_xml() {
        let mut slide = Slide::new(SlideId(1), TemplateId::Title);
        slide.content.insert("title".into(), "Hola & adiós".into());
        let xml = xml_of(&slide, "slate");

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<a:t>Hola &amp; adiós</a:t>"));
        assert!(xml.contains(r#"sz="4400" b="1""#));
        assert!(xml.contains(r#"<a:off x="457200" y="1828800"/>"#));
        assert!(xml.contains(r#"<a:srgbClr val="ffffff"/>"#));
        assert_eq!(xml.matches("<p:sp>").count(), 2);
    }

    #[test]
    fn test_bullets_become_paragraphs() {
        let mut slide = Slide::new(SlideId(1), TemplateId::Bullets);
        slide.content.insert("body".into(), "uno\ndos\n\ntres".into());
        let xml = xml_of(&slide, "dark");

        assert_eq!(xml.matches(r#"<a:buChar char="•"/>"#).count(), 3);
        assert!(xml.contains("<a:endParaRPr"));
        assert!(xml.contains(r#"<a:srgbClr val="1e293b"/>"#));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let slide = Slide::new(SlideId(1), TemplateId::BigNumber);
        let xml = xml_of(&slide, "slate");
        assert!(xml.contains("<a:t>0</a:t>"));
        assert!(!xml.contains("100%"));
        assert!(!xml.contains("Descripción del dato"));
    }
}

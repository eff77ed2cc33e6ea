//! OOXML package assembly.

use crate::slide::{emu, XmlOut};
use std::io::{Cursor, Write};
use zenslide_core::primitives::{PAGE_HEIGHT_IN, PAGE_WIDTH_IN};
use zenslide_core::{Error, Result};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const NS_PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const REL_OFFICE_DOC: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_SLIDE_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_SLIDE_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";

/// First id PowerPoint accepts in `p:sldIdLst`.
const FIRST_SLIDE_ID: usize = 256;
/// First id in `p:sldMasterIdLst`.
const MASTER_ID: &str = "2147483648";
/// Relationship ids taken before the slides in `presentation.xml.rels`.
const RESERVED_RELS: usize = 2;

const SLIDE_MASTER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst><p:txStyles><p:titleStyle><a:lvl1pPr><a:defRPr sz="4400"/></a:lvl1pPr></p:titleStyle><p:bodyStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:bodyStyle><p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:otherStyle></p:txStyles></p:sldMaster>"#;

const SLIDE_LAYOUT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="ZenSlide"><a:themeElements><a:clrScheme name="ZenSlide"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F2937"/></a:dk2><a:lt2><a:srgbClr val="F3F4F6"/></a:lt2><a:accent1><a:srgbClr val="4F46E5"/></a:accent1><a:accent2><a:srgbClr val="6366F1"/></a:accent2><a:accent3><a:srgbClr val="2563EB"/></a:accent3><a:accent4><a:srgbClr val="6B7280"/></a:accent4><a:accent5><a:srgbClr val="9CA3AF"/></a:accent5><a:accent6><a:srgbClr val="4B5563"/></a:accent6><a:hlink><a:srgbClr val="4F46E5"/></a:hlink><a:folHlink><a:srgbClr val="6366F1"/></a:folHlink></a:clrScheme><a:fontScheme name="ZenSlide"><a:majorFont><a:latin typeface="Arial"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Arial"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="ZenSlide"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;

/// One relationship entry.
struct Rel<'a> {
    id: String,
    kind: &'a str,
    target: String,
}

fn rels_xml(rels: &[Rel<'_>]) -> Result<Vec<u8>> {
    let mut xml = XmlOut::new()?;
    xml.start("Relationships", &[("xmlns", NS_PKG_RELS)])?;
    for rel in rels {
        xml.empty(
            "Relationship",
            &[("Id", rel.id.as_str()), ("Type", rel.kind), ("Target", rel.target.as_str())],
        )?;
    }
    xml.end("Relationships")?;
    Ok(xml.finish())
}

fn content_types_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlOut::new()?;
    xml.start("Types", &[("xmlns", NS_TYPES)])?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;

    let mut overrides = vec![
        ("/ppt/presentation.xml".to_string(), CT_PRESENTATION),
        ("/ppt/slideMasters/slideMaster1.xml".to_string(), CT_SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml".to_string(), CT_SLIDE_LAYOUT),
        ("/ppt/theme/theme1.xml".to_string(), CT_THEME),
    ];
    for n in 1..=slide_count {
        overrides.push((format!("/ppt/slides/slide{}.xml", n), CT_SLIDE));
    }
    for (part, content_type) in &overrides {
        xml.empty("Override", &[("PartName", part.as_str()), ("ContentType", *content_type)])?;
    }

    xml.end("Types")?;
    Ok(xml.finish())
}

fn presentation_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlOut::new()?;
    xml.start(
        "p:presentation",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;

    xml.start("p:sldMasterIdLst", &[])?;
    xml.empty("p:sldMasterId", &[("id", MASTER_ID), ("r:id", "rId1")])?;
    xml.end("p:sldMasterIdLst")?;

    xml.start("p:sldIdLst", &[])?;
    for n in 0..slide_count {
        let id = (FIRST_SLIDE_ID + n).to_string();
        let rel = format!("rId{}", RESERVED_RELS + n + 1);
        xml.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel.as_str())])?;
    }
    xml.end("p:sldIdLst")?;

    let cx = emu(PAGE_WIDTH_IN).to_string();
    let cy = emu(PAGE_HEIGHT_IN).to_string();
    xml.empty("p:sldSz", &[("cx", cx.as_str()), ("cy", cy.as_str()), ("type", "screen16x9")])?;
    xml.empty("p:notesSz", &[("cx", "6858000"), ("cy", "9144000")])?;

    xml.end("p:presentation")?;
    Ok(xml.finish())
}

fn presentation_rels(slide_count: usize) -> Result<Vec<u8>> {
    let mut rels = vec![
        Rel {
            id: "rId1".into(),
            kind: REL_SLIDE_MASTER,
            target: "slideMasters/slideMaster1.xml".into(),
        },
        Rel {
            id: "rId2".into(),
            kind: REL_THEME,
            target: "theme/theme1.xml".into(),
        },
    ];
    for n in 1..=slide_count {
        rels.push(Rel {
            id: format!("rId{}", RESERVED_RELS + n),
            kind: REL_SLIDE,
            target: format!("slides/slide{}.xml", n),
        });
    }
    rels_xml(&rels)
}

fn single_rel(kind: &str, target: &str) -> Result<Vec<u8>> {
    rels_xml(&[Rel {
        id: "rId1".into(),
        kind,
        target: target.into(),
    }])
}

/// Zip the fixed package parts around already-generated slide parts.
pub fn build_package(slides: &[Vec<u8>]) -> Result<Vec<u8>> {
    let count = slides.len();
    let master_rels = rels_xml(&[
        Rel {
            id: "rId1".into(),
            kind: REL_SLIDE_LAYOUT,
            target: "../slideLayouts/slideLayout1.xml".into(),
        },
        Rel {
            id: "rId2".into(),
            kind: REL_THEME,
            target: "../theme/theme1.xml".into(),
        },
    ])?;

    let mut parts: Vec<(String, Vec<u8>)> = vec![
        ("[Content_Types].xml".into(), content_types_xml(count)?),
        ("_rels/.rels".into(), single_rel(REL_OFFICE_DOC, "ppt/presentation.xml")?),
        ("ppt/presentation.xml".into(), presentation_xml(count)?),
        ("ppt/_rels/presentation.xml.rels".into(), presentation_rels(count)?),
        (
            "ppt/slideMasters/slideMaster1.xml".into(),
            SLIDE_MASTER_XML.as_bytes().to_vec(),
        ),
        ("ppt/slideMasters/_rels/slideMaster1.xml.rels".into(), master_rels),
        (
            "ppt/slideLayouts/slideLayout1.xml".into(),
            SLIDE_LAYOUT_XML.as_bytes().to_vec(),
        ),
        (
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels".into(),
            single_rel(REL_SLIDE_MASTER, "../slideMasters/slideMaster1.xml")?,
        ),
        ("ppt/theme/theme1.xml".into(), THEME_XML.as_bytes().to_vec()),
    ];

    let layout_rel = single_rel(REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml")?;
    for (i, slide) in slides.iter().enumerate() {
        parts.push((format!("ppt/slides/slide{}.xml", i + 1), slide.clone()));
        parts.push((
            format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
            layout_rel.clone(),
        ));
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, bytes) in &parts {
        zip.start_file(name.as_str(), options)
            .map_err(|e| Error::Zip(format!("Failed to add '{}': {}", name, e)))?;
        zip.write_all(bytes)?;
    }
    let cursor = zip
        .finish()
        .map_err(|e| Error::Zip(format!("Failed to finish package: {}", e)))?;

    log::debug!("Packaged {} parts for {} slides", parts.len(), count);
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presentation_lists_slides_from_256() {
        let xml = String::from_utf8(presentation_xml(3).unwrap()).unwrap();
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId3"/>"#));
        assert!(xml.contains(r#"<p:sldId id="258" r:id="rId5"/>"#));
        assert!(xml.contains(r#"cx="9144000" cy="5143500" type="screen16x9""#));
    }

    #[test]
    fn test_content_types_cover_slides() {
        let xml = String::from_utf8(content_types_xml(2).unwrap()).unwrap();
        assert!(xml.contains("/ppt/slides/slide1.xml"));
        assert!(xml.contains("/ppt/slides/slide2.xml"));
        assert!(!xml.contains("/ppt/slides/slide3.xml"));
    }

    #[test]
    fn test_package_is_zip() {
        let bytes = build_package(&[b"<p:sld/>".to_vec()]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}

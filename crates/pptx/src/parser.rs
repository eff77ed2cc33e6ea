//! Reader for exported PPTX packages.
//!
//! Walks the slide relationships of a package and pulls back each slide's
//! background color and text shapes, in document order.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::io::{Read, Seek};
use zenslide_core::{Error, Result};
use zip::ZipArchive;

/// A text shape read back from a slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedShape {
    /// Paragraphs joined with `\n`.
    pub text: String,
    /// Offset in EMUs.
    pub x: i64,
    pub y: i64,
}

/// One slide read back from a package.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedSlide {
    /// 1-based position in the deck.
    pub number: usize,
    pub background: Option<String>,
    pub shapes: Vec<ParsedShape>,
}

impl ParsedSlide {
    /// All shape texts, in document order.
    pub fn texts(&self) -> Vec<&str> {
        self.shapes.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Parser for PPTX packages.
pub struct PptxParser;

impl PptxParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse every slide of a package, in presentation order.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<Vec<ParsedSlide>> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::Zip(format!("Failed to open ZIP: {}", e)))?;

        let slide_order = self.get_slide_order(&mut archive)?;
        log::debug!("Package lists {} slides", slide_order.len());

        slide_order
            .iter()
            .enumerate()
            .map(|(idx, path)| self.parse_slide(&mut archive, path, idx + 1))
            .collect()
    }

    /// Ordered slide part paths from the presentation relationships.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = read_file_from_archive(archive, "ppt/_rels/presentation.xml.rels")?;
        let mut slides: Vec<(String, Option<usize>)> = Vec::new();

        let mut reader = Reader::from_str(&rels_content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if local_name(e.name().as_ref()) == b"Relationship" =>
                {
                    let rel_type = attribute(e, b"Type").unwrap_or_default();
                    let target = attribute(e, b"Target").unwrap_or_default();

                    if rel_type.ends_with("/slide") {
                        let order = extract_slide_number(&target);
                        let path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("ppt/{}", target),
                        };
                        slides.push((path, order));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!("Error parsing relationships: {}", e)));
                }
                _ => {}
            }
        }

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        number: usize,
    ) -> Result<ParsedSlide> {
        let content = read_file_from_archive(archive, slide_path)?;
        let mut slide = ParsedSlide {
            number,
            ..Default::default()
        };

        let mut reader = Reader::from_str(&content);
        reader.trim_text(true);

        let mut current: Option<ParsedShape> = None;
        let mut paragraphs: Vec<String> = Vec::new();
        let mut in_background = false;
        let mut in_text = false;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| Error::Xml(format!("Error parsing {}: {}", slide_path, e)))?;

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    match local_name(e.name().as_ref()) {
                        b"bg" if !is_empty => in_background = true,
                        b"srgbClr" if in_background && slide.background.is_none() => {
                            slide.background = attribute(e, b"val");
                        }
                        b"sp" if !is_empty => {
                            current = Some(ParsedShape::default());
                            paragraphs.clear();
                        }
                        b"off" => {
                            if let Some(shape) = current.as_mut() {
                                shape.x = attribute(e, b"x").and_then(|v| v.parse().ok()).unwrap_or(0);
                                shape.y = attribute(e, b"y").and_then(|v| v.parse().ok()).unwrap_or(0);
                            }
                        }
                        b"p" if current.is_some() => paragraphs.push(String::new()),
                        b"t" if !is_empty => in_text = true,
                        _ => {}
                    }
                }
                Event::Text(ref e) if in_text => {
                    let text = e
                        .unescape()
                        .map_err(|e| Error::Xml(format!("Bad text in {}: {}", slide_path, e)))?;
                    if let Some(paragraph) = paragraphs.last_mut() {
                        paragraph.push_str(&text);
                    }
                }
                Event::End(ref e) => match local_name(e.name().as_ref()) {
                    b"bg" => in_background = false,
                    b"t" => in_text = false,
                    b"sp" => {
                        if let Some(mut shape) = current.take() {
                            shape.text = paragraphs.join("\n");
                            slide.shapes.push(shape);
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(slide)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

fn read_file_from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::Zip(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::Zip(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Local part of a possibly prefixed element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Trailing number of a part name like "slides/slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");
    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.chars().rev().collect::<String>().parse().ok()
}

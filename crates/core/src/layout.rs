//! Fixed-canvas geometry shared by every visual backend.
//!
//! Slides are laid out on a 1280×720 canvas. Editable, read-only and
//! thumbnail renders all use the boxes computed here; thumbnails only
//! scale the result.

use crate::template::{FieldStyle, LayoutShape};
use serde::Serialize;

/// Canonical canvas width in logical units.
pub const CANVAS_WIDTH: f32 = 1280.0;
/// Canonical canvas height in logical units.
pub const CANVAS_HEIGHT: f32 = 720.0;

/// Average glyph advance as a fraction of the font size.
const AVG_ADVANCE: f32 = 0.52;

/// Axis-aligned box on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Inner padding of each layout shape: (left/right, top, bottom).
fn padding(shape: LayoutShape) -> (f32, f32, f32) {
    match shape {
        LayoutShape::CenteredStack | LayoutShape::CenteredBigNumber => (48.0, 48.0, 48.0),
        LayoutShape::TitleBody | LayoutShape::TwoColumn => (48.0, 64.0, 48.0),
        LayoutShape::CenteredQuote => (64.0, 64.0, 64.0),
    }
}

fn advance(style: &FieldStyle) -> f32 {
    let mut factor = AVG_ADVANCE;
    if style.weight >= 700 {
        factor += 0.06;
    }
    if style.serif {
        factor -= 0.04;
    }
    style.font_size * factor
}

/// Greedy word wrap of `text` into lines that fit `width`.
///
/// Explicit newlines always break; an empty paragraph yields an empty line.
pub fn wrap_lines(text: &str, width: f32, style: &FieldStyle) -> Vec<String> {
    let max_chars = ((width / advance(style)).floor() as usize).max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_len = 0;
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if line_len > 0 && line_len + 1 + word_len > max_chars {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            if line_len + word_len <= max_chars {
                line.push_str(word);
                line_len += word_len;
                continue;
            }

            // Hard-split a word longer than a whole line; the line is empty here.
            let chars: Vec<char> = word.chars().collect();
            let mut chunks = chars.chunks(max_chars);
            let last = chunks.next_back().unwrap_or_default();
            lines.extend(chunks.map(|chunk| chunk.iter().collect::<String>()));
            line = last.iter().collect();
            line_len = last.len();
        }
        lines.push(line);
    }

    lines
}

/// Height of `text` set in `style` inside `width`.
pub fn text_height(text: &str, width: f32, style: &FieldStyle) -> f32 {
    let lines = wrap_lines(text, width, style).len().max(1);
    lines as f32 * style.font_size * style.line_height
}

/// One field to place: its style, its kind and the text that will be shown.
pub struct FieldBox<'a> {
    pub style: &'a FieldStyle,
    pub multi_line: bool,
    pub shown: &'a str,
}

/// Compute a box for each field, in field order.
pub fn layout_fields(shape: LayoutShape, fields: &[FieldBox<'_>]) -> Vec<Rect> {
    let (pad_x, pad_top, pad_bottom) = padding(shape);
    let inner_width = CANVAS_WIDTH - 2.0 * pad_x;
    let inner_bottom = CANVAS_HEIGHT - pad_bottom;

    match shape {
        LayoutShape::TwoColumn => {
            let gap = 32.0;
            let column = (inner_width - gap) / 2.0;
            fields
                .iter()
                .enumerate()
                .map(|(i, _)| {
                    Rect::new(
                        pad_x + i as f32 * (column + gap),
                        pad_top,
                        column,
                        inner_bottom - pad_top,
                    )
                })
                .collect()
        }
        LayoutShape::TitleBody => {
            let mut y = pad_top;
            let mut rects = Vec::with_capacity(fields.len());
            for field in fields {
                y += field.style.space_before;
                let height = if field.multi_line {
                    (inner_bottom - y).max(field.style.font_size * field.style.line_height)
                } else {
                    let mut h = text_height(field.shown, inner_width, field.style);
                    if field.style.rule_below {
                        // pb-2 plus the 2px rule
                        h += 10.0;
                    }
                    h
                };
                rects.push(Rect::new(pad_x, y, inner_width, height));
                y += height + field.style.space_after;
            }
            rects
        }
        LayoutShape::CenteredStack
        | LayoutShape::CenteredQuote
        | LayoutShape::CenteredBigNumber => {
            let heights: Vec<f32> = fields
                .iter()
                .map(|f| text_height(f.shown, inner_width, f.style))
                .collect();
            let total: f32 = fields
                .iter()
                .zip(&heights)
                .map(|(f, h)| f.style.space_before + h + f.style.space_after)
                .sum();

            let mut y = ((CANVAS_HEIGHT - total) / 2.0).max(pad_top);
            let mut rects = Vec::with_capacity(fields.len());
            for (field, height) in fields.iter().zip(heights) {
                y += field.style.space_before;
                rects.push(Rect::new(pad_x, y, inner_width, height));
                y += height + field.style.space_after;
            }
            rects
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateId;

    #[test]
    fn test_wrap_respects_newlines() {
        let style = TemplateId::Bullets.template().fields[1].style;
        let lines = wrap_lines("uno\n\ndos", 1000.0, &style);
        assert_eq!(lines, vec!["uno", "", "dos"]);
    }

    #[test]
    fn test_wrap_breaks_long_text() {
        let style = TemplateId::Title.template().fields[0].style;
        let text = "palabra ".repeat(40);
        let lines = wrap_lines(text.trim(), 600.0, &style);
        assert!(lines.len() > 1);
        let max = (600.0 / advance(&style)).floor() as usize;
        assert!(lines.iter().all(|l| l.chars().count() <= max));
    }

    #[test]
    fn test_hard_split_long_word() {
        let style = TemplateId::BigNumber.template().fields[0].style;
        let lines = wrap_lines(&"9".repeat(50), 400.0, &style);
        assert!(lines.len() >= 2);
        assert_eq!(lines.concat(), "9".repeat(50));
    }

    #[test]
    fn test_hard_split_huge_word_in_chunks() {
        let style = TemplateId::BigNumber.template().fields[0].style;
        let max = (400.0 / advance(&style)).floor() as usize;
        let word = "9".repeat(200_000);
        let lines = wrap_lines(&format!("ab {}", word), 400.0, &style);

        assert_eq!(lines[0], "ab");
        assert_eq!(lines.len(), 1 + 200_000_usize.div_ceil(max));
        assert!(lines[1..].iter().all(|l| l.chars().count() <= max));
        assert_eq!(lines[1..].concat(), word);
    }

    #[test]
    fn test_two_columns_side_by_side() {
        let template = TemplateId::TwoCol.template();
        let boxes: Vec<FieldBox<'_>> = template
            .fields
            .iter()
            .map(|f| FieldBox {
                style: &f.style,
                multi_line: true,
                shown: "",
            })
            .collect();
        let rects = layout_fields(template.layout, &boxes);
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].y, rects[1].y);
        assert!(rects[0].x + rects[0].width < rects[1].x);
        assert!(rects[1].x + rects[1].width <= CANVAS_WIDTH);
    }

    #[test]
    fn test_centered_stack_is_centered_and_ordered() {
        let template = TemplateId::Title.template();
        let boxes: Vec<FieldBox<'_>> = template
            .fields
            .iter()
            .map(|f| FieldBox {
                style: &f.style,
                multi_line: false,
                shown: "Hola",
            })
            .collect();
        let rects = layout_fields(template.layout, &boxes);
        assert!(rects[0].bottom() <= rects[1].y);
        let top_gap = rects[0].y;
        let bottom_gap = CANVAS_HEIGHT - rects[1].bottom();
        assert!((top_gap - bottom_gap).abs() < 30.0);
    }
}

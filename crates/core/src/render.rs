//! Slide renderer: one pure projection from a slide to a visual tree.
//!
//! The same function serves the editor, the presentation view, thumbnails
//! and export capture. Only [`RenderMode`] changes the controls; text,
//! order, geometry and typography are identical in every mode.

use crate::layout::{self, FieldBox, Rect, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::store::SlideStore;
use crate::template::{FieldKind, FieldStyle, LayoutShape, TemplateId, TextColor};
use crate::theme::Theme;
use crate::types::{Slide, SlideId};
use serde::Serialize;

/// Opacity of placeholder hints.
pub const HINT_OPACITY: f32 = 0.35;

/// Opacity of the page indicator.
pub const PAGE_INDICATOR_OPACITY: f32 = 0.3;

/// Default thumbnail scale for the slide list.
pub const THUMBNAIL_SCALE: f32 = 0.16;

/// How a slide is projected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum RenderMode {
    /// Focusable inputs that write back on every change.
    Editable,
    /// Static text; presentation view and export capture.
    ReadOnly,
    /// Scaled, non-interactive, hidden from assistive technology.
    Thumbnail { scale: f32 },
}

impl RenderMode {
    pub fn thumbnail() -> Self {
        Self::Thumbnail {
            scale: THUMBNAIL_SCALE,
        }
    }

    pub fn scale(&self) -> f32 {
        match self {
            Self::Thumbnail { scale } => *scale,
            _ => 1.0,
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Editable)
    }

    pub fn is_accessible(&self) -> bool {
        !matches!(self, Self::Thumbnail { .. })
    }
}

/// The control a field becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Control {
    TextInput,
    TextArea,
    TextBlock,
}

/// Prompt text shown for an empty field. Hints are never part of an
/// exported artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hint {
    pub text: &'static str,
    pub opacity: f32,
}

/// One projected field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub key: &'static str,
    pub control: Control,
    /// Authored text; empty when the field has no content.
    pub text: String,
    pub hint: Option<Hint>,
    pub style: FieldStyle,
    /// Resolved `rrggbb` text color.
    pub color: String,
    /// Box on the 1280×720 canvas.
    pub bounds: Rect,
}

impl FieldView {
    /// What a viewer sees: the authored text, or the hint when empty.
    pub fn shown(&self) -> &str {
        match &self.hint {
            Some(hint) if self.text.is_empty() => hint.text,
            _ => &self.text,
        }
    }
}

/// Small non-editable "ZenSlide • k" stamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageIndicator {
    /// 1-based position in the deck.
    pub position: usize,
    pub label: String,
    pub opacity: f32,
}

/// A rendered slide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideView {
    pub slide: SlideId,
    pub template: TemplateId,
    pub layout: LayoutShape,
    pub mode: RenderMode,
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub text_color: String,
    pub fields: Vec<FieldView>,
    pub page: PageIndicator,
}

impl SlideView {
    /// Field texts in render order.
    pub fn texts(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.text.as_str()).collect()
    }

    /// Field keys in render order.
    pub fn keys(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.key).collect()
    }

    /// Output size after the mode's scale.
    pub fn scaled_size(&self) -> (f32, f32) {
        let scale = self.mode.scale();
        (self.width * scale, self.height * scale)
    }
}

fn resolve_color(color: TextColor, theme: &Theme) -> String {
    color.fixed_hex().unwrap_or(theme.text).to_string()
}

/// Project `slide`, sitting at 0-based `index` in its deck.
pub fn render(slide: &Slide, index: usize, theme: &Theme, mode: RenderMode) -> SlideView {
    let template = slide.template();

    let shown: Vec<&str> = template
        .fields
        .iter()
        .map(|f| slide.value(f.key).unwrap_or(f.placeholder))
        .collect();
    let boxes: Vec<FieldBox<'_>> = template
        .fields
        .iter()
        .zip(&shown)
        .map(|(f, text)| FieldBox {
            style: &f.style,
            multi_line: f.kind == FieldKind::MultiLine,
            shown: text,
        })
        .collect();
    let bounds = layout::layout_fields(template.layout, &boxes);

    let fields = template
        .fields
        .iter()
        .zip(bounds)
        .map(|(spec, bounds)| {
            let text = slide.value(spec.key).unwrap_or_default().to_string();
            let control = match (mode, spec.kind) {
                (RenderMode::Editable, FieldKind::SingleLine) => Control::TextInput,
                (RenderMode::Editable, FieldKind::MultiLine) => Control::TextArea,
                _ => Control::TextBlock,
            };
            let hint = text.is_empty().then_some(Hint {
                text: spec.placeholder,
                opacity: HINT_OPACITY,
            });
            FieldView {
                key: spec.key,
                control,
                text,
                hint,
                style: spec.style,
                color: resolve_color(spec.style.color, theme),
                bounds,
            }
        })
        .collect();

    SlideView {
        slide: slide.id,
        template: slide.template,
        layout: template.layout,
        mode,
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        background: theme.background.to_string(),
        text_color: theme.text.to_string(),
        fields,
        page: PageIndicator {
            position: index + 1,
            label: format!("ZenSlide • {}", index + 1),
            opacity: PAGE_INDICATOR_OPACITY,
        },
    }
}

/// Project the slide at `index` of `store` with the store's theme.
pub fn render_at(store: &SlideStore, index: usize, mode: RenderMode) -> Option<SlideView> {
    store
        .get(index)
        .map(|slide| render(slide, index, store.theme(), mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> SlideStore {
        let mut store = SlideStore::new();
        store.create_slide("BULLETS").unwrap();
        store.update_field(1, "title", "Agenda").unwrap();
        store.update_field(1, "body", "• uno\n• dos").unwrap();
        store.create_slide("QUOTE").unwrap();
        store.update_field(2, "author", "Ada").unwrap();
        store
    }

    #[test]
    fn test_editable_and_read_only_match() {
        let store = sample_store();
        for index in 0..store.len() {
            let editable = render_at(&store, index, RenderMode::Editable).unwrap();
            let read_only = render_at(&store, index, RenderMode::ReadOnly).unwrap();
            let template = store.get(index).unwrap().template();

            assert_eq!(editable.keys(), template.field_keys());
            assert_eq!(editable.keys(), read_only.keys());
            assert_eq!(editable.texts(), read_only.texts());
            for (a, b) in editable.fields.iter().zip(&read_only.fields) {
                assert_eq!(a.bounds, b.bounds);
                assert_eq!(a.style, b.style);
                assert_eq!(a.color, b.color);
            }
        }
    }

    #[test]
    fn test_controls_per_mode() {
        let store = sample_store();
        let editable = render_at(&store, 1, RenderMode::Editable).unwrap();
        assert_eq!(editable.fields[0].control, Control::TextInput);
        assert_eq!(editable.fields[1].control, Control::TextArea);

        let read_only = render_at(&store, 1, RenderMode::ReadOnly).unwrap();
        assert!(read_only.fields.iter().all(|f| f.control == Control::TextBlock));
    }

    #[test]
    fn test_placeholder_is_a_hint() {
        let store = sample_store();
        let view = render_at(&store, 2, RenderMode::ReadOnly).unwrap();
        let quote = &view.fields[0];
        assert_eq!(quote.text, "");
        assert_eq!(quote.shown(), "\"Tu cita inspiradora aquí\"");
        assert!(quote.hint.as_ref().unwrap().opacity < 1.0);

        let author = &view.fields[1];
        assert_eq!(author.shown(), "Ada");
        assert!(author.hint.is_none());
    }

    #[test]
    fn test_page_indicator() {
        let store = sample_store();
        let view = render_at(&store, 2, RenderMode::ReadOnly).unwrap();
        assert_eq!(view.page.position, 3);
        assert_eq!(view.page.label, "ZenSlide • 3");
        assert!(render_at(&store, 3, RenderMode::ReadOnly).is_none());
    }

    #[test]
    fn test_thumbnail_scales_read_only() {
        let store = sample_store();
        let thumb = render_at(&store, 1, RenderMode::thumbnail()).unwrap();
        let read_only = render_at(&store, 1, RenderMode::ReadOnly).unwrap();
        assert!(!thumb.mode.is_interactive());
        assert!(!thumb.mode.is_accessible());
        assert_eq!(thumb.fields, read_only.fields);
        let (w, h) = thumb.scaled_size();
        assert!((w - 1280.0 * THUMBNAIL_SCALE).abs() < 0.01);
        assert!((h - 720.0 * THUMBNAIL_SCALE).abs() < 0.01);
    }

    #[test]
    fn test_theme_colors() {
        let mut store = sample_store();
        store.set_theme("dark").unwrap();
        let view = render_at(&store, 0, RenderMode::ReadOnly).unwrap();
        assert_eq!(view.background, "0f172a");
        // Title follows the theme; subtitle is a fixed muted gray.
        assert_eq!(view.fields[0].color, "ffffff");
        assert_eq!(view.fields[1].color, "6b7280");
    }

    #[test]
    fn test_view_serializes_for_inspection() {
        let store = sample_store();
        let view = render_at(&store, 1, RenderMode::ReadOnly).unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["mode"]["mode"], "read-only");
        assert_eq!(json["template"], "BULLETS");
        assert_eq!(json["fields"][0]["key"], "title");
        assert_eq!(json["fields"][1]["control"], "text-block");
    }
}

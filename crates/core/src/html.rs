//! HTML backend for rendered slides and the editor page.
//!
//! Fields are absolutely positioned at their canvas boxes with the same
//! typography in every mode, so the editable view and the read-only view
//! line up pixel for pixel.

use crate::presentation::Presenter;
use crate::render::{self, Control, FieldView, RenderMode, SlideView};
use crate::store::SlideStore;
use crate::template::Align;
use std::fmt::Write as FmtWrite;

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn field_css(field: &FieldView) -> String {
    let style = &field.style;
    let align = match style.align {
        Align::Left => "left",
        Align::Center => "center",
        Align::Right => "right",
    };
    let mut css = format!(
        "position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;\
         font-size:{}px;line-height:{};font-weight:{};text-align:{};color:#{};\
         background:transparent;border:0;outline:none;resize:none;padding:0;margin:0;\
         white-space:pre-wrap;overflow:hidden;",
        field.bounds.x,
        field.bounds.y,
        field.bounds.width,
        field.bounds.height,
        style.font_size,
        style.line_height,
        style.weight,
        align,
        field.color,
    );
    if style.italic {
        css.push_str("font-style:italic;");
    }
    if style.serif {
        css.push_str("font-family:Georgia,serif;");
    }
    if style.rule_below {
        css.push_str("border-bottom:2px solid #f3f4f6;");
    }
    css
}

fn write_field(html: &mut String, field: &FieldView) {
    let css = field_css(field);
    let placeholder = field.hint.as_ref().map(|h| h.text).unwrap_or_default();
    match field.control {
        Control::TextInput => {
            let _ = write!(
                html,
                r#"<input type="text" data-field="{}" style="{}" value="{}" placeholder="{}">"#,
                field.key,
                css,
                escape_html(&field.text),
                escape_html(placeholder),
            );
        }
        Control::TextArea => {
            let _ = write!(
                html,
                r#"<textarea data-field="{}" style="{}" placeholder="{}">{}</textarea>"#,
                field.key,
                css,
                escape_html(placeholder),
                escape_html(&field.text),
            );
        }
        Control::TextBlock => {
            let _ = write!(html, r#"<div data-field="{}" style="{}">"#, field.key, css);
            match &field.hint {
                Some(hint) if field.text.is_empty() => {
                    let _ = write!(
                        html,
                        r#"<span class="hint" style="opacity:{}">{}</span>"#,
                        hint.opacity,
                        escape_html(hint.text)
                    );
                }
                _ => html.push_str(&escape_html(&field.text)),
            }
            html.push_str("</div>");
        }
    }
}

/// Render one slide view as a self-contained HTML fragment.
pub fn slide_html(view: &SlideView) -> String {
    let mut html = String::with_capacity(2048);
    let scale = view.mode.scale();

    let mut attrs = format!(
        r#"class="slide-render-target" data-slide="{}" data-template="{}""#,
        view.slide.0, view.template
    );
    if !view.mode.is_accessible() {
        attrs.push_str(r#" aria-hidden="true" inert"#);
    }

    let _ = write!(
        html,
        "<div {} style=\"position:relative;overflow:hidden;width:{}px;height:{}px;\
         background:#{};color:#{};transform:scale({});transform-origin:top left;\"{}>",
        attrs,
        view.width,
        view.height,
        view.background,
        view.text_color,
        scale,
        if view.mode.is_interactive() {
            ""
        } else {
            " data-readonly"
        },
    );

    for field in &view.fields {
        write_field(&mut html, field);
    }

    let _ = write!(
        html,
        "<div class=\"page-indicator\" style=\"position:absolute;right:24px;bottom:16px;\
         font-size:14px;opacity:{};pointer-events:none;\">{}</div>",
        view.page.opacity,
        escape_html(&view.page.label)
    );
    html.push_str("</div>");
    html
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html><html><head><meta charset="utf-8"><title>ZenSlide</title></head>"#;

/// The editor page: thumbnail list, template picker, active slide and toast.
pub fn editor_page(store: &SlideStore, toast: Option<&str>) -> String {
    let mut html = String::with_capacity(16 * 1024);
    html.push_str(PAGE_HEAD);
    html.push_str(r#"<body style="margin:0;font-family:sans-serif;background:#f9fafb;">"#);

    html.push_str(r#"<aside class="slide-list" style="float:left;width:240px;padding:16px;">"#);
    for (index, slide) in store.slides().iter().enumerate() {
        let view = render::render(slide, index, store.theme(), RenderMode::thumbnail());
        let (w, h) = view.scaled_size();
        let active = if index == store.active_index() {
            " active"
        } else {
            ""
        };
        let _ = write!(
            html,
            r#"<div class="thumbnail{}" data-index="{}" style="position:relative;width:{}px;height:{}px;overflow:hidden;margin-bottom:16px;"><span class="number">{}</span>{}</div>"#,
            active,
            index,
            w,
            h,
            index + 1,
            slide_html(&view)
        );
    }
    html.push_str(r#"<div class="template-picker">"#);
    for template in crate::template::list_all() {
        let _ = write!(
            html,
            r#"<button data-template="{}">{}</button>"#,
            template.id,
            escape_html(template.display_name)
        );
    }
    html.push_str("</div></aside>");

    html.push_str(r#"<main class="editor" style="margin-left:272px;padding:48px;">"#);
    let active = store.active_index();
    let view = render::render(store.active_slide(), active, store.theme(), RenderMode::Editable);
    html.push_str(&slide_html(&view));
    html.push_str("</main>");

    if let Some(message) = toast {
        let _ = write!(
            html,
            r#"<div class="toast" role="status">{}</div>"#,
            escape_html(message)
        );
    }

    html.push_str("</body></html>");
    html
}

/// The full-screen presentation view for the presenter's current slide.
pub fn presentation_page(store: &SlideStore, presenter: &Presenter) -> String {
    let cursor = presenter.cursor().unwrap_or(store.active_index());
    let mut html = String::with_capacity(4096);
    html.push_str(PAGE_HEAD);
    html.push_str(r#"<body style="margin:0;background:#000;" tabindex="0">"#);
    if let Some(view) = render::render_at(store, cursor, RenderMode::ReadOnly) {
        html.push_str(&slide_html(&view));
    }
    html.push_str(r#"<button class="close" aria-label="Close">×</button>"#);
    let _ = write!(
        html,
        r#"<div class="progress">{}</div>"#,
        escape_html(&presenter.progress(store.len()))
    );
    html.push_str("</body></html>");
    html
}

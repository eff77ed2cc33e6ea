//! The fixed template catalog.
//!
//! Every slide references one of these templates. A template fixes the
//! layout shape and the ordered list of fields; that order is the reading
//! order every renderer and exporter must follow.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a catalog template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateId {
    Title,
    Bullets,
    TwoCol,
    Quote,
    BigNumber,
}

impl TemplateId {
    /// Canonical catalog symbol, e.g. `TWO_COL`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "TITLE",
            Self::Bullets => "BULLETS",
            Self::TwoCol => "TWO_COL",
            Self::Quote => "QUOTE",
            Self::BigNumber => "BIG_NUMBER",
        }
    }

    /// The catalog entry for this id.
    pub fn template(&self) -> &'static Template {
        // The catalog holds exactly one entry per variant.
        &CATALOG[*self as usize]
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = Error;

    /// Accepts the catalog symbol in any case, with `-` or `_` separators.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        CATALOG
            .iter()
            .map(|t| t.id)
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| Error::UnknownTemplate(s.to_string()))
    }
}

/// How the fields of a template are arranged on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutShape {
    /// Fields stacked and centered both ways.
    CenteredStack,
    /// A heading on top and a body filling the rest.
    TitleBody,
    /// Two equal columns side by side.
    TwoColumn,
    /// A large centered quote with its attribution below.
    CenteredQuote,
    /// One oversized figure with a caption.
    CenteredBigNumber,
}

/// Whether a field holds one line or free multi-line text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    SingleLine,
    MultiLine,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Color of a field's text. `Theme` follows the deck theme; the rest are
/// fixed neutrals layered on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextColor {
    Theme,
    Strong,
    Body,
    Muted,
    Subtle,
    Accent,
}

impl TextColor {
    /// Hex color (`rrggbb`) for fixed roles; `None` for `Theme`.
    pub fn fixed_hex(&self) -> Option<&'static str> {
        match self {
            Self::Theme => None,
            Self::Strong => Some("1f2937"),
            Self::Body => Some("4b5563"),
            Self::Muted => Some("6b7280"),
            Self::Subtle => Some("9ca3af"),
            Self::Accent => Some("4f46e5"),
        }
    }
}

/// Typography of one field, shared by every rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldStyle {
    /// Font size in canvas pixels (1280×720 canvas).
    pub font_size: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// CSS-style font weight.
    pub weight: u16,
    pub italic: bool,
    pub serif: bool,
    pub align: Align,
    pub color: TextColor,
    /// Spacing above the field, in canvas pixels.
    pub space_before: f32,
    /// Spacing below the field, in canvas pixels.
    pub space_after: f32,
    /// Thin rule drawn under the field (heading underline).
    pub rule_below: bool,
}

impl FieldStyle {
    const fn text(font_size: f32, line_height: f32) -> Self {
        Self {
            font_size,
            line_height,
            weight: 400,
            italic: false,
            serif: false,
            align: Align::Left,
            color: TextColor::Theme,
            space_before: 0.0,
            space_after: 0.0,
            rule_below: false,
        }
    }

    const fn weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    const fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    const fn color(mut self, color: TextColor) -> Self {
        self.color = color;
        self
    }

    const fn italic_serif(mut self) -> Self {
        self.italic = true;
        self.serif = true;
        self
    }

    const fn before(mut self, px: f32) -> Self {
        self.space_before = px;
        self
    }

    const fn after(mut self, px: f32) -> Self {
        self.space_after = px;
        self
    }

    const fn ruled(mut self) -> Self {
        self.rule_below = true;
        self
    }
}

/// Schema of one editable slot within a template.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    /// Key in the slide content map, unique within its template.
    pub key: &'static str,
    /// Prompt shown while the field is empty.
    pub placeholder: &'static str,
    pub kind: FieldKind,
    pub style: FieldStyle,
}

/// A catalog template.
#[derive(Debug, Clone, Serialize)]
pub struct Template {
    pub id: TemplateId,
    pub display_name: &'static str,
    pub layout: LayoutShape,
    /// Fields in canonical reading order.
    pub fields: &'static [FieldSpec],
}

impl Template {
    /// Look up a field by key.
    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Whether `key` names a field of this template.
    pub fn has_field(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// Field keys in declaration order.
    pub fn field_keys(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.key).collect()
    }
}

const TITLE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "title",
        placeholder: "Título de la Presentación",
        kind: FieldKind::SingleLine,
        style: FieldStyle::text(48.0, 1.0)
            .weight(700)
            .align(Align::Center)
            .after(24.0),
    },
    FieldSpec {
        key: "subtitle",
        placeholder: "Añade un subtítulo...",
        kind: FieldKind::SingleLine,
        style: FieldStyle::text(24.0, 1.333)
            .align(Align::Center)
            .color(TextColor::Muted),
    },
];

const BULLETS_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "title",
        placeholder: "Título de la diapositiva",
        kind: FieldKind::SingleLine,
        style: FieldStyle::text(36.0, 1.111).weight(700).after(32.0).ruled(),
    },
    FieldSpec {
        key: "body",
        placeholder: "• Escribe tus puntos clave aquí\n• Presiona Enter para nueva línea",
        kind: FieldKind::MultiLine,
        style: FieldStyle::text(20.0, 1.625).color(TextColor::Body),
    },
];

const TWO_COL_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "col1",
        placeholder: "Columna Izquierda\n\nEscribe aquí...",
        kind: FieldKind::MultiLine,
        style: FieldStyle::text(20.0, 1.4).color(TextColor::Body),
    },
    FieldSpec {
        key: "col2",
        placeholder: "Columna Derecha\n\nEscribe aquí...",
        kind: FieldKind::MultiLine,
        style: FieldStyle::text(20.0, 1.4).color(TextColor::Body),
    },
];

const QUOTE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "quote",
        placeholder: "\"Tu cita inspiradora aquí\"",
        kind: FieldKind::MultiLine,
        style: FieldStyle::text(36.0, 1.111)
            .italic_serif()
            .align(Align::Center)
            .color(TextColor::Strong)
            .after(32.0),
    },
    FieldSpec {
        key: "author",
        placeholder: "- Autor",
        kind: FieldKind::SingleLine,
        style: FieldStyle::text(20.0, 1.4)
            .align(Align::Right)
            .color(TextColor::Muted),
    },
];

const BIG_NUMBER_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "number",
        placeholder: "100%",
        kind: FieldKind::SingleLine,
        style: FieldStyle::text(128.0, 1.0)
            .weight(900)
            .align(Align::Center)
            .color(TextColor::Accent),
    },
    FieldSpec {
        key: "label",
        placeholder: "Descripción del dato",
        kind: FieldKind::SingleLine,
        style: FieldStyle::text(30.0, 1.2)
            .weight(500)
            .align(Align::Center)
            .color(TextColor::Subtle)
            .before(16.0),
    },
];

/// The catalog, in declaration order. Indexed by `TemplateId as usize`.
static CATALOG: [Template; 5] = [
    Template {
        id: TemplateId::Title,
        display_name: "Título Principal",
        layout: LayoutShape::CenteredStack,
        fields: TITLE_FIELDS,
    },
    Template {
        id: TemplateId::Bullets,
        display_name: "Título y Texto",
        layout: LayoutShape::TitleBody,
        fields: BULLETS_FIELDS,
    },
    Template {
        id: TemplateId::TwoCol,
        display_name: "Dos Columnas",
        layout: LayoutShape::TwoColumn,
        fields: TWO_COL_FIELDS,
    },
    Template {
        id: TemplateId::Quote,
        display_name: "Cita Destacada",
        layout: LayoutShape::CenteredQuote,
        fields: QUOTE_FIELDS,
    },
    Template {
        id: TemplateId::BigNumber,
        display_name: "Dato Grande",
        layout: LayoutShape::CenteredBigNumber,
        fields: BIG_NUMBER_FIELDS,
    },
];

/// All templates in catalog order. Drives the template picker.
pub fn list_all() -> &'static [Template] {
    &CATALOG
}

/// Resolve a template by its symbol.
pub fn lookup(template_id: &str) -> Result<&'static Template> {
    template_id.parse::<TemplateId>().map(|id| id.template())
}

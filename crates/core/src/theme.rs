//! Deck-wide color themes.

use crate::error::{Error, Result};
use serde::Serialize;

/// Coarse light/dark classification of a theme's background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Light,
    Dark,
}

/// A catalog theme. Colors are `rrggbb` hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub id: &'static str,
    pub background: &'static str,
    pub text: &'static str,
    pub accent: &'static str,
}

/// The two colors a structural export resolves a theme to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportPalette {
    pub background: &'static str,
    pub foreground: &'static str,
}

static THEMES: [Theme; 4] = [
    Theme {
        id: "slate",
        background: "ffffff",
        text: "0f172a",
        accent: "0f172a",
    },
    Theme {
        id: "dark",
        background: "0f172a",
        text: "ffffff",
        accent: "6366f1",
    },
    Theme {
        id: "cream",
        background: "fdfbf7",
        text: "292524",
        accent: "292524",
    },
    Theme {
        id: "blue",
        background: "eff6ff",
        text: "1e3a8a",
        accent: "2563eb",
    },
];

impl Theme {
    /// All themes in catalog order.
    pub fn all() -> &'static [Theme] {
        &THEMES
    }

    /// The theme a new editor starts with.
    pub fn default_theme() -> &'static Theme {
        &THEMES[0]
    }

    pub fn lookup(id: &str) -> Result<&'static Theme> {
        THEMES
            .iter()
            .find(|t| t.id.eq_ignore_ascii_case(id.trim()))
            .ok_or_else(|| Error::UnknownTheme(id.to_string()))
    }

    /// Classify the background by relative luminance.
    pub fn tone(&self) -> Tone {
        if luminance(self.background) < 0.5 {
            Tone::Dark
        } else {
            Tone::Light
        }
    }

    /// Foreground/background pair used by the structural exporter.
    pub fn export_palette(&self) -> ExportPalette {
        match self.tone() {
            Tone::Dark => ExportPalette {
                background: "1e293b",
                foreground: "ffffff",
            },
            Tone::Light => ExportPalette {
                background: "ffffff",
                foreground: "000000",
            },
        }
    }
}

/// Relative luminance (0..1) of an `rrggbb` color. Malformed input counts as white.
fn luminance(hex: &str) -> f64 {
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .unwrap_or(255) as f64
            / 255.0
    };
    0.2126 * channel(0) + 0.7152 * channel(2) + 0.0722 * channel(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(Theme::lookup("dark").unwrap().text, "ffffff");
        assert_eq!(Theme::lookup("Cream").unwrap().id, "cream");
        assert!(matches!(Theme::lookup("neon"), Err(Error::UnknownTheme(_))));
    }

    #[test]
    fn test_only_dark_is_dark() {
        let dark: Vec<&str> = Theme::all()
            .iter()
            .filter(|t| t.tone() == Tone::Dark)
            .map(|t| t.id)
            .collect();
        assert_eq!(dark, vec!["dark"]);
    }

    #[test]
    fn test_export_palette_has_two_colors() {
        let dark = Theme::lookup("dark").unwrap().export_palette();
        assert_eq!(dark.background, "1e293b");
        assert_eq!(dark.foreground, "ffffff");

        for id in ["slate", "cream", "blue"] {
            let palette = Theme::lookup(id).unwrap().export_palette();
            assert_eq!(palette.background, "ffffff");
            assert_eq!(palette.foreground, "000000");
        }
    }
}

//! Domain types for slides and their content.

use crate::template::{Template, TemplateId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier of a slide, never reused within one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlideId(pub u64);

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One entry of the deck: a template reference plus field values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,

    /// Fixed at creation.
    pub template: TemplateId,

    /// Field values keyed by field key. Missing keys mean "empty".
    pub content: BTreeMap<String, String>,
}

impl Slide {
    /// Create a slide with empty content.
    pub fn new(id: SlideId, template: TemplateId) -> Self {
        Self {
            id,
            template,
            content: BTreeMap::new(),
        }
    }

    /// The catalog template this slide uses.
    pub fn template(&self) -> &'static Template {
        self.template.template()
    }

    /// Authored value of a field, or `None` when absent or empty.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.content
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Authored values in template field order, `None` for empty fields.
    pub fn values_in_order(&self) -> Vec<(&'static str, Option<&str>)> {
        self.template()
            .fields
            .iter()
            .map(|f| (f.key, self.value(f.key)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_counts_as_absent() {
        let mut slide = Slide::new(SlideId(1), TemplateId::Title);
        assert_eq!(slide.value("title"), None);

        slide.content.insert("title".into(), String::new());
        assert_eq!(slide.value("title"), None);

        slide.content.insert("title".into(), "Hola".into());
        assert_eq!(slide.value("title"), Some("Hola"));
    }

    #[test]
    fn test_values_follow_field_order() {
        let mut slide = Slide::new(SlideId(7), TemplateId::Quote);
        slide.content.insert("author".into(), "Ada".into());

        let values = slide.values_in_order();
        assert_eq!(values, vec![("quote", None), ("author", Some("Ada"))]);
    }
}

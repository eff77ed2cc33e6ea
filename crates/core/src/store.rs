//! The slide store: the deck, the active cursor and the deck theme.
//!
//! All writes to the deck go through the methods here. Renderers and
//! exporters only ever receive `&SlideStore`.

use crate::error::{Error, Result};
use crate::template::TemplateId;
use crate::theme::Theme;
use crate::types::{Slide, SlideId};

/// Smallest deck the store allows.
pub const MIN_DECK_SIZE: usize = 1;

/// Direction for [`SlideStore::move_slide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// In-memory, ordered, never-empty deck.
#[derive(Debug, Clone)]
pub struct SlideStore {
    slides: Vec<Slide>,
    cursor: usize,
    next_id: u64,
    theme: &'static Theme,
}

impl Default for SlideStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SlideStore {
    /// A store holding the welcome title slide, with the default theme.
    pub fn new() -> Self {
        let mut store = Self::with_template(TemplateId::Title);
        let welcome = &mut store.slides[0];
        welcome
            .content
            .insert("title".into(), "Bienvenidos a ZenSlide".into());
        welcome
            .content
            .insert("subtitle".into(), "La forma minimalista de presentar".into());
        store
    }

    /// A store holding one empty slide of the given template.
    pub fn with_template(template: TemplateId) -> Self {
        Self {
            slides: vec![Slide::new(SlideId(1), template)],
            cursor: 0,
            next_id: 2,
            theme: Theme::default_theme(),
        }
    }

    /// Slides in deck order.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    /// Position of a slide in the deck.
    pub fn position(&self, id: SlideId) -> Option<usize> {
        self.slides.iter().position(|s| s.id == id)
    }

    /// The active cursor.
    pub fn active_index(&self) -> usize {
        self.cursor
    }

    pub fn active_slide(&self) -> &Slide {
        &self.slides[self.cursor]
    }

    pub fn theme(&self) -> &'static Theme {
        self.theme
    }

    /// Switch the deck theme.
    pub fn set_theme(&mut self, theme_id: &str) -> Result<()> {
        self.theme = Theme::lookup(theme_id)?;
        log::debug!("Theme set to {}", self.theme.id);
        Ok(())
    }

    /// Append an empty slide and make it active.
    pub fn create_slide(&mut self, template_id: &str) -> Result<SlideId> {
        let template: TemplateId = template_id.parse()?;
        let id = SlideId(self.next_id);
        self.next_id += 1;

        self.slides.push(Slide::new(id, template));
        self.cursor = self.slides.len() - 1;
        log::debug!("Created slide {} ({}) at {}", id, template, self.cursor);
        Ok(id)
    }

    /// Set one field of the slide at `slide_index`.
    ///
    /// Keys the slide's template does not declare are ignored, so content
    /// only ever holds declared keys.
    pub fn update_field(&mut self, slide_index: usize, field_key: &str, value: &str) -> Result<()> {
        let len = self.slides.len();
        let slide = self
            .slides
            .get_mut(slide_index)
            .ok_or(Error::SlideOutOfRange {
                index: slide_index,
                len,
            })?;

        if !slide.template().has_field(field_key) {
            log::warn!(
                "Ignoring unknown field '{}' for {} slide {}",
                field_key,
                slide.template,
                slide.id
            );
            return Ok(());
        }

        slide.content.insert(field_key.to_string(), value.to_string());
        Ok(())
    }

    /// Remove the slide at `index`. Fails with `DeckUnderflow` on a
    /// one-slide deck, leaving the deck untouched.
    pub fn delete_slide(&mut self, index: usize) -> Result<Slide> {
        if self.slides.len() <= MIN_DECK_SIZE {
            return Err(Error::DeckUnderflow);
        }
        if index >= self.slides.len() {
            return Err(Error::SlideOutOfRange {
                index,
                len: self.slides.len(),
            });
        }

        let removed = self.slides.remove(index);
        if index <= self.cursor {
            self.cursor = self.cursor.saturating_sub(1);
        }
        self.cursor = self.cursor.min(self.slides.len() - 1);
        log::debug!("Deleted slide {} at {}", removed.id, index);
        Ok(removed)
    }

    /// Swap the slide at `index` with its neighbor. Returns whether a swap
    /// happened; moving past either end is a no-op. The cursor follows the
    /// moved slide.
    pub fn move_slide(&mut self, index: usize, direction: Direction) -> bool {
        let target = match direction {
            Direction::Up if index > 0 && index < self.slides.len() => index - 1,
            Direction::Down if index + 1 < self.slides.len() => index + 1,
            _ => return false,
        };

        self.slides.swap(index, target);
        self.cursor = target;
        true
    }

    /// Set the active cursor, clamped into the deck.
    pub fn set_active(&mut self, index: usize) {
        self.cursor = index.min(self.slides.len() - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates(store: &SlideStore) -> Vec<TemplateId> {
        store.slides().iter().map(|s| s.template).collect()
    }

    #[test]
    fn test_new_store_has_welcome_slide() {
        let store = SlideStore::new();
        assert_eq!(store.len(), 1);
        assert_eq!(store.active_index(), 0);
        assert_eq!(store.active_slide().value("title"), Some("Bienvenidos a ZenSlide"));
        assert_eq!(store.theme().id, "slate");
    }

    #[test]
    fn test_create_appends_and_activates() {
        let mut store = SlideStore::new();
        let id = store.create_slide("BULLETS").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.active_index(), 1);
        assert_eq!(store.active_slide().id, id);
        assert!(store.active_slide().content.is_empty());
    }

    #[test]
    fn test_create_unknown_template() {
        let mut store = SlideStore::new();
        assert!(matches!(store.create_slide("CHART"), Err(Error::UnknownTemplate(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_ids_never_reused() {
        let mut store = SlideStore::new();
        let a = store.create_slide("QUOTE").unwrap();
        store.delete_slide(1).unwrap();
        let b = store.create_slide("QUOTE").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_update_field() {
        let mut store = SlideStore::new();
        store.create_slide("BULLETS").unwrap();
        store.update_field(1, "body", "uno\ndos").unwrap();
        assert_eq!(store.get(1).unwrap().value("body"), Some("uno\ndos"));

        store.update_field(1, "subtitle", "ignored").unwrap();
        assert!(!store.get(1).unwrap().content.contains_key("subtitle"));

        assert!(matches!(
            store.update_field(5, "body", "x"),
            Err(Error::SlideOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_delete_last_slide_rejected() {
        let mut store = SlideStore::new();
        let before = store.slides().to_vec();
        assert!(matches!(store.delete_slide(0), Err(Error::DeckUnderflow)));
        assert_eq!(store.slides(), &before[..]);
    }

    #[test]
    fn test_delete_adjusts_cursor() {
        let mut store = SlideStore::new();
        store.create_slide("BULLETS").unwrap();
        store.create_slide("QUOTE").unwrap();
        store.create_slide("TWO_COL").unwrap();
        assert_eq!(store.active_index(), 3);

        // Deleting after the cursor leaves it alone.
        store.set_active(1);
        store.delete_slide(2).unwrap();
        assert_eq!(store.active_index(), 1);

        // Deleting before the cursor keeps it on the same slide.
        store.set_active(2);
        let active = store.active_slide().id;
        store.delete_slide(0).unwrap();
        assert_eq!(store.active_index(), 1);
        assert_eq!(store.active_slide().id, active);
    }

    #[test]
    fn test_move_is_bounded() {
        let mut store = SlideStore::new();
        store.create_slide("BULLETS").unwrap();
        assert!(!store.move_slide(0, Direction::Up));
        assert!(!store.move_slide(1, Direction::Down));
        assert!(!store.move_slide(9, Direction::Up));
        assert_eq!(templates(&store), vec![TemplateId::Title, TemplateId::Bullets]);
    }

    #[test]
    fn test_move_swap_is_own_inverse() {
        let mut store = SlideStore::new();
        store.create_slide("BULLETS").unwrap();
        store.create_slide("QUOTE").unwrap();
        store.create_slide("BIG_NUMBER").unwrap();
        let original = store.slides().to_vec();

        for i in 1..store.len() {
            assert!(store.move_slide(i, Direction::Up));
            assert_eq!(store.active_index(), i - 1);
            assert!(store.move_slide(i - 1, Direction::Down));
            assert_eq!(store.active_index(), i);
            assert_eq!(store.slides(), &original[..]);
        }
    }

    #[test]
    fn test_set_active_clamps() {
        let mut store = SlideStore::new();
        store.create_slide("QUOTE").unwrap();
        store.set_active(42);
        assert_eq!(store.active_index(), 1);
    }

    #[test]
    fn test_deck_never_empties() {
        let mut store = SlideStore::new();
        let ops = ["add", "del", "del", "add", "add", "up", "del", "down", "del", "del", "del"];
        for (step, op) in ops.iter().enumerate() {
            match *op {
                "add" => {
                    store.create_slide("TWO_COL").unwrap();
                }
                "del" => {
                    let _ = store.delete_slide(store.active_index());
                }
                "up" => {
                    store.move_slide(store.active_index(), Direction::Up);
                }
                _ => {
                    store.move_slide(store.active_index(), Direction::Down);
                }
            }
            assert!(store.len() >= MIN_DECK_SIZE, "empty after step {}", step);
            assert!(store.active_index() < store.len());
        }
    }

    #[test]
    fn test_welcome_scenario() {
        let mut store = SlideStore::new();
        store.create_slide("BULLETS").unwrap();
        store.create_slide("QUOTE").unwrap();

        store.set_active(1);
        store.delete_slide(1).unwrap();
        assert_eq!(templates(&store), vec![TemplateId::Title, TemplateId::Quote]);
        assert_eq!(store.active_index(), 0);

        assert!(store.move_slide(1, Direction::Up));
        assert_eq!(templates(&store), vec![TemplateId::Quote, TemplateId::Title]);
    }
}

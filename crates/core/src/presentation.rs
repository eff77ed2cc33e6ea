//! Full-screen presentation controller.
//!
//! Two states: inactive, or active at a cursor. The cursor moves one slide
//! at a time, never wraps and never leaves the deck.

use crate::store::SlideStore;

/// Inputs accepted while presenting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationInput {
    /// Forward key.
    Next,
    /// Pointer click anywhere on the slide; same as `Next`.
    Click,
    /// Back key.
    Previous,
    /// Escape key.
    Escape,
    /// The explicit close control.
    Close,
}

impl PresentationInput {
    /// Map a key name (DOM `KeyboardEvent.key` style) to an input.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowRight" | "Right" | "PageDown" | " " | "Enter" => Some(Self::Next),
            "ArrowLeft" | "Left" | "PageUp" | "Backspace" => Some(Self::Previous),
            "Escape" | "Esc" => Some(Self::Escape),
            _ => None,
        }
    }
}

/// Presenter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresenterState {
    #[default]
    Inactive,
    Active { cursor: usize },
}

/// Result of feeding one input to the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Still presenting at this cursor (possibly unchanged).
    At(usize),
    /// Presentation ended; the editor resumes at this cursor.
    Exited(usize),
    /// The presenter was not active.
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct Presenter {
    state: PresenterState,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PresenterState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PresenterState::Active { .. })
    }

    pub fn cursor(&self) -> Option<usize> {
        match self.state {
            PresenterState::Active { cursor } => Some(cursor),
            PresenterState::Inactive => None,
        }
    }

    /// Enter presentation mode at the store's active cursor.
    pub fn start(&mut self, store: &SlideStore) {
        self.state = PresenterState::Active {
            cursor: store.active_index(),
        };
        log::debug!("Presentation started at {}", store.active_index());
    }

    /// Apply one input against a deck of `deck_len` slides.
    pub fn handle(&mut self, input: PresentationInput, deck_len: usize) -> Transition {
        let PresenterState::Active { cursor } = self.state else {
            return Transition::Ignored;
        };
        let last = deck_len.saturating_sub(1);

        match input {
            PresentationInput::Next | PresentationInput::Click => {
                let cursor = (cursor + 1).min(last);
                self.state = PresenterState::Active { cursor };
                Transition::At(cursor)
            }
            PresentationInput::Previous => {
                let cursor = cursor.saturating_sub(1).min(last);
                self.state = PresenterState::Active { cursor };
                Transition::At(cursor)
            }
            PresentationInput::Escape | PresentationInput::Close => {
                self.state = PresenterState::Inactive;
                let cursor = cursor.min(last);
                log::debug!("Presentation exited at {}", cursor);
                Transition::Exited(cursor)
            }
        }
    }

    /// Overlay text, e.g. `2 / 5`. Empty when inactive.
    pub fn progress(&self, deck_len: usize) -> String {
        match self.cursor() {
            Some(cursor) => format!("{} / {}", cursor + 1, deck_len),
            None => String::new(),
        }
    }
}

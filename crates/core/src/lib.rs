//! Slide data model, template catalog, renderer, presentation controller
//! and export contract for the ZenSlide deck editor.

pub mod error;
pub mod export;
pub mod html;
pub mod layout;
pub mod notify;
pub mod presentation;
pub mod primitives;
pub mod render;
pub mod session;
pub mod store;
pub mod template;
pub mod theme;
pub mod types;

pub use error::{Error, Result};
pub use export::{Capability, ExportFormat, Exporter, Libraries, LoadState};
pub use notify::{Notifier, Toast};
pub use presentation::{PresentationInput, Presenter, Transition};
pub use render::{render, render_at, RenderMode, SlideView};
pub use session::Editor;
pub use store::{Direction, SlideStore};
pub use template::{list_all, lookup, Template, TemplateId};
pub use theme::Theme;
pub use types::{Slide, SlideId};

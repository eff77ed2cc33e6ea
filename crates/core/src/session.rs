//! The editor session.
//!
//! Owns the store, the presenter, the export registry and the notifier.
//! Every user action enters here, and every core error is turned into a
//! notification at this boundary; the deck always stays usable.

use crate::error::{Error, Result};
use crate::export::{Capability, ExportFormat, Exporter, Libraries};
use crate::notify::{messages, Notifier, Toast};
use crate::presentation::{PresentationInput, Presenter, Transition};
use crate::store::{Direction, SlideStore};
use crate::types::SlideId;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Editor<N: Notifier = Toast> {
    store: SlideStore,
    presenter: Presenter,
    libraries: Libraries,
    exporters: Vec<Box<dyn Exporter>>,
    notifier: N,
    output_dir: PathBuf,
    exporting: bool,
}

impl Editor<Toast> {
    /// Editor with the welcome deck and a toast notifier.
    pub fn new() -> Self {
        Self::with_notifier(SlideStore::new(), Toast::new())
    }
}

impl Default for Editor<Toast> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Notifier> Editor<N> {
    pub fn with_notifier(store: SlideStore, notifier: N) -> Self {
        Self {
            store,
            presenter: Presenter::new(),
            libraries: Libraries::new(),
            exporters: Vec::new(),
            notifier,
            output_dir: PathBuf::from("."),
            exporting: false,
        }
    }

    /// Directory export files are written to.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn register_exporter(&mut self, exporter: Box<dyn Exporter>) {
        self.exporters.push(exporter);
    }

    pub fn store(&self) -> &SlideStore {
        &self.store
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn libraries(&self) -> &Libraries {
        &self.libraries
    }

    pub fn libraries_mut(&mut self) -> &mut Libraries {
        &mut self.libraries
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    /// Editing is suspended while presenting.
    fn editing_suspended(&self, action: &str) -> bool {
        if self.presenter.is_active() {
            log::debug!("Ignoring '{}' while presenting", action);
            return true;
        }
        false
    }

    fn report(&mut self, err: &Error) {
        match err {
            Error::DeckUnderflow => self.notifier.notify(messages::MIN_ONE_SLIDE),
            other => {
                log::warn!("{}", other);
                self.notifier.notify(&other.to_string());
            }
        }
    }

    /// Append a slide of the given template and make it active.
    pub fn add_slide(&mut self, template_id: &str) -> Option<SlideId> {
        if self.editing_suspended("add") {
            return None;
        }
        match self.store.create_slide(template_id) {
            Ok(id) => Some(id),
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    /// Set a field of the active slide.
    pub fn edit_field(&mut self, key: &str, value: &str) {
        if self.editing_suspended("edit") {
            return;
        }
        let index = self.store.active_index();
        if let Err(e) = self.store.update_field(index, key, value) {
            self.report(&e);
        }
    }

    /// Delete the active slide. Returns whether a slide was removed.
    pub fn delete_active(&mut self) -> bool {
        let index = self.store.active_index();
        self.delete_slide(index)
    }

    pub fn delete_slide(&mut self, index: usize) -> bool {
        if self.editing_suspended("delete") {
            return false;
        }
        match self.store.delete_slide(index) {
            Ok(_) => true,
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Move the active slide one step.
    pub fn move_active(&mut self, direction: Direction) -> bool {
        if self.editing_suspended("move") {
            return false;
        }
        let index = self.store.active_index();
        self.store.move_slide(index, direction)
    }

    pub fn select(&mut self, index: usize) {
        if self.editing_suspended("select") {
            return;
        }
        self.store.set_active(index);
    }

    pub fn set_theme(&mut self, theme_id: &str) {
        if self.editing_suspended("theme") {
            return;
        }
        if let Err(e) = self.store.set_theme(theme_id) {
            self.report(&e);
        }
    }

    /// Enter presentation mode at the active slide.
    pub fn present(&mut self) {
        self.presenter.start(&self.store);
    }

    /// Feed a presentation input. On exit the editor resumes at the
    /// presentation's last cursor.
    pub fn presentation_input(&mut self, input: PresentationInput) -> Transition {
        let transition = self.presenter.handle(input, self.store.len());
        if let Transition::Exited(cursor) = transition {
            self.store.set_active(cursor);
        }
        transition
    }

    /// Export the deck and write the artifact into the output directory.
    ///
    /// Failures are already reported through the notifier; the returned
    /// error is for callers that want the cause.
    pub fn export(&mut self, format: ExportFormat) -> Result<PathBuf> {
        if self.exporting {
            self.notifier.notify(messages::EXPORT_BUSY);
            return Err(Error::ExportInProgress);
        }

        let (working, done, failed) = match format {
            ExportFormat::Pdf => (messages::GENERATING_PDF, messages::PDF_DONE, messages::PDF_FAILED),
            ExportFormat::Pptx => (
                messages::GENERATING_PPTX,
                messages::PPTX_DONE,
                messages::PPTX_FAILED,
            ),
        };

        let Some(exporter) = self.exporters.iter_mut().find(|e| e.format() == format) else {
            let capability = match format {
                ExportFormat::Pdf => Capability::PagedDocument,
                ExportFormat::Pptx => Capability::PresentationDocument,
            };
            self.notifier.notify(messages::LIBRARIES_LOADING);
            return Err(Error::LibraryNotReady(capability));
        };

        if let Some(capability) = self.libraries.missing(exporter.requires()) {
            self.notifier.notify(messages::LIBRARIES_LOADING);
            return Err(Error::LibraryNotReady(capability));
        }

        self.exporting = true;
        self.notifier.notify(working);

        let path = self.output_dir.join(format.file_name());
        let result = exporter
            .export(&self.store)
            .and_then(|bytes| write_whole(&path, &bytes));
        self.exporting = false;

        match result {
            Ok(()) => {
                log::info!("Exported {} slides to {}", self.store.len(), path.display());
                self.notifier.notify(done);
                Ok(path)
            }
            Err(e) => {
                log::error!("Export to {} failed: {}", path.display(), e);
                self.notifier.notify(failed);
                Err(Error::ExportFailure(e.to_string()))
            }
        }
    }
}

/// Write `bytes` to `path` through a sibling temp file, so a failed write
/// never leaves a truncated artifact behind.
fn write_whole(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    if let Err(e) = fs::write(&partial, bytes).and_then(|_| fs::rename(&partial, path)) {
        let _ = fs::remove_file(&partial);
        return Err(e.into());
    }
    Ok(())
}

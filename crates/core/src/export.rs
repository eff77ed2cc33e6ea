//! Export contract shared by the rasterizing and structural exporters.
//!
//! Exporters read the deck and return a finished artifact in memory. They
//! never mutate the store, and nothing is written to disk unless the
//! whole deck exported successfully.

use crate::error::Result;
use crate::store::SlideStore;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Canonical output page size in logical units.
pub const PAGE_SIZE: (u32, u32) = (1280, 720);

/// Oversampling factor for rasterized pages.
pub const RASTER_SCALE: f32 = 2.0;

/// An external capability an exporter depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Capability {
    /// Drawing a rendered slide into pixels.
    Rasterizer,
    /// Building paginated (PDF) documents.
    PagedDocument,
    /// Building presentation (PPTX) documents.
    PresentationDocument,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rasterizer => "rasterizer",
            Self::PagedDocument => "paged document builder",
            Self::PresentationDocument => "presentation document builder",
        })
    }
}

/// Load state of one capability. `Failed` is permanent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Registry of capabilities and their load state.
#[derive(Debug, Clone, Default)]
pub struct Libraries {
    states: HashMap<Capability, LoadState>,
}

impl Libraries {
    /// Every capability starts out loading.
    pub fn new() -> Self {
        let states = [
            Capability::Rasterizer,
            Capability::PagedDocument,
            Capability::PresentationDocument,
        ]
        .into_iter()
        .map(|c| (c, LoadState::Loading))
        .collect();
        Self { states }
    }

    /// Everything ready; mostly for tests and embedded use.
    pub fn all_ready() -> Self {
        let mut libraries = Self::new();
        for state in libraries.states.values_mut() {
            *state = LoadState::Ready;
        }
        libraries
    }

    pub fn state(&self, capability: Capability) -> &LoadState {
        self.states.get(&capability).unwrap_or(&LoadState::Loading)
    }

    pub fn is_ready(&self, capability: Capability) -> bool {
        *self.state(capability) == LoadState::Ready
    }

    /// Record a finished load. Ignored once the capability has failed.
    pub fn mark_ready(&mut self, capability: Capability) {
        if let Some(LoadState::Failed(_)) = self.states.get(&capability) {
            log::warn!("Ignoring late load of failed capability {}", capability);
            return;
        }
        log::debug!("Capability ready: {}", capability);
        self.states.insert(capability, LoadState::Ready);
    }

    pub fn mark_failed(&mut self, capability: Capability, reason: impl Into<String>) {
        let reason = reason.into();
        log::warn!("Capability {} failed to load: {}", capability, reason);
        self.states.insert(capability, LoadState::Failed(reason));
    }

    /// First required capability that is not ready.
    pub fn missing(&self, required: &[Capability]) -> Option<Capability> {
        required.iter().copied().find(|c| !self.is_ready(*c))
    }
}

/// The two export targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Pptx,
}

impl ExportFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }

    /// Output file name.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Pdf => "ZenSlide-Presentation.pdf",
            Self::Pptx => "ZenSlide-Presentation.pptx",
        }
    }
}

/// A whole-deck exporter.
pub trait Exporter {
    fn format(&self) -> ExportFormat;

    /// Capabilities that must be ready before [`Exporter::export`] runs.
    fn requires(&self) -> &[Capability];

    /// Export every slide, in deck order, into one artifact.
    fn export(&mut self, store: &SlideStore) -> Result<Vec<u8>>;
}

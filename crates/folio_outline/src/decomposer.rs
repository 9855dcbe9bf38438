//! Layered outline decomposer.

use crate::strategies::{NUMBERED_STRATEGIES, generic_headings};
use derive_getters::Getters;
use folio_core::ChapterStub;
use serde::{Deserialize, Serialize};

/// Decomposer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct DecomposerConfig {
    /// Maximum chapters taken by the generic heading fallback; `None` disables the cap.
    #[serde(default = "default_fallback_cap")]
    fallback_cap: Option<usize>,
}

fn default_fallback_cap() -> Option<usize> {
    Some(10)
}

impl Default for DecomposerConfig {
    fn default() -> Self {
        Self {
            fallback_cap: default_fallback_cap(),
        }
    }
}

impl DecomposerConfig {
    /// Settings with a custom fallback cap.
    pub fn new(fallback_cap: Option<usize>) -> Self {
        Self { fallback_cap }
    }
}

/// Extracts chapter stubs from outline text.
///
/// The numbered strategies are tried in priority order and the first one that
/// matches anything wins outright; matches are never merged across strategies.
/// When none matches, every heading becomes a chapter in document order.
#[derive(Debug, Clone, Default)]
pub struct OutlineDecomposer {
    config: DecomposerConfig,
}

impl OutlineDecomposer {
    /// Create a decomposer.
    pub fn new(config: DecomposerConfig) -> Self {
        Self { config }
    }

    /// Decompose an outline.
    #[tracing::instrument(skip(self, outline), fields(outline_len = outline.len()))]
    pub fn decompose(&self, outline: &str) -> Vec<ChapterStub> {
        if let Some(stubs) = NUMBERED_STRATEGIES
            .iter()
            .find_map(|strategy| strategy(outline))
        {
            tracing::debug!(chapters = stubs.len(), "Matched numbered chapter headings");
            return stubs;
        }

        let stubs = generic_headings(outline, self.config.fallback_cap);
        if stubs.is_empty() {
            tracing::warn!("No chapters derivable from outline");
        } else {
            tracing::debug!(chapters = stubs.len(), "Fell back to generic headings");
        }
        stubs
    }
}

/// Decompose with default settings.
pub fn decompose(outline: &str) -> Vec<ChapterStub> {
    OutlineDecomposer::default().decompose(outline)
}

//! Token budgets for generation requests.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Per-request limits passed to the text generation service.
///
/// # Examples
///
/// ```
/// use folio_pipeline::GenerationSettings;
///
/// let settings = GenerationSettings::default();
/// assert_eq!(*settings.chapter_max_tokens(), 8192);
/// assert_eq!(*settings.summary_input_chars(), 8000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GenerationSettings {
    /// Budget for outline generation and regeneration
    #[serde(default = "default_outline_max_tokens")]
    outline_max_tokens: u32,
    /// Budget for chapter generation and regeneration
    #[serde(default = "default_chapter_max_tokens")]
    chapter_max_tokens: u32,
    /// Budget for chapter summaries
    #[serde(default = "default_summary_max_tokens")]
    summary_max_tokens: u32,
    /// Characters of chapter content fed to the summary prompt
    #[serde(default = "default_summary_input_chars")]
    summary_input_chars: usize,
}

fn default_outline_max_tokens() -> u32 {
    4096
}

fn default_chapter_max_tokens() -> u32 {
    8192
}

fn default_summary_max_tokens() -> u32 {
    500
}

fn default_summary_input_chars() -> usize {
    8000
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            outline_max_tokens: default_outline_max_tokens(),
            chapter_max_tokens: default_chapter_max_tokens(),
            summary_max_tokens: default_summary_max_tokens(),
            summary_input_chars: default_summary_input_chars(),
        }
    }
}

impl GenerationSettings {
    /// Settings with explicit budgets.
    pub fn new(
        outline_max_tokens: u32,
        chapter_max_tokens: u32,
        summary_max_tokens: u32,
        summary_input_chars: usize,
    ) -> Self {
        Self {
            outline_max_tokens,
            chapter_max_tokens,
            summary_max_tokens,
            summary_input_chars,
        }
    }
}

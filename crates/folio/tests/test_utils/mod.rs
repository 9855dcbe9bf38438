//! Test utilities for end-to-end tests.

#![allow(dead_code)]

use async_trait::async_trait;
use folio::{FolioResult, Notifier, PipelineEvent, TextGenerator};
use folio_core::{GenerateRequest, GenerateResponse};
use std::sync::Mutex;

/// Outline with three numbered chapters.
pub const OUTLINE: &str =
    "# Rust at Sea\n\n## Chapter 1: Casting Off\n\n## Chapter 2: Open Water\n\n## Chapter 3: Landfall\n";

/// Answers outline prompts with [`OUTLINE`], summary prompts with a one-liner and
/// everything else with a short chapter body.
#[derive(Default)]
pub struct BookWriter {
    calls: Mutex<usize>,
}

impl BookWriter {
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl TextGenerator for BookWriter {
    async fn generate(&self, req: &GenerateRequest) -> FolioResult<GenerateResponse> {
        *self.calls.lock().unwrap() += 1;
        let text = if req.prompt.starts_with("Summarize") {
            "The crew prepared and sailed.".to_string()
        } else if req.prompt.contains("CHAPTER TO WRITE") || req.prompt.starts_with("You are revising a chapter") {
            "## Preparation\n\nThe **crew** checked every line.\n\n- rope\n- sail\n".to_string()
        } else {
            OUTLINE.to_string()
        };
        Ok(GenerateResponse { text })
    }

    fn provider_name(&self) -> &'static str {
        "test"
    }

    fn model_name(&self) -> &str {
        "book-writer"
    }
}

/// Keeps every event it receives.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingNotifier {
    pub fn names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(PipelineEvent::name)
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, event: &PipelineEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

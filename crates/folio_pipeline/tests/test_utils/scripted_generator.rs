//! Scripted text generator and recording notifier.

use async_trait::async_trait;
use folio_core::{GenerateRequest, GenerateResponse};
use folio_error::{FolioResult, GenerationError, GenerationErrorKind};
use folio_interface::{Notifier, PipelineEvent, TextGenerator};
use std::sync::Mutex;

/// Answers each prompt according to its kind.
///
/// - outline prompts return the configured outline
/// - chapter prompts return `Body of chapter N`
/// - revision prompts return `Revised body of chapter N`
/// - summary prompts return `Summary of chapter N`
///
/// Any prompt containing the configured failure marker gets a 500 error instead.
pub struct ScriptedGenerator {
    outline: String,
    revised_outline: String,
    fail_marker: Mutex<Option<String>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedGenerator {
    pub fn new(outline: impl Into<String>) -> Self {
        let outline = outline.into();
        Self {
            revised_outline: format!("{}\n## Chapter 99: Appendix\n", outline),
            outline,
            fail_marker: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail every prompt containing `marker`.
    pub fn fail_on(&self, marker: impl Into<String>) {
        *self.fail_marker.lock().unwrap() = Some(marker.into());
    }

    /// Stop failing.
    pub fn recover(&self) {
        *self.fail_marker.lock().unwrap() = None;
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }

    /// Prompt used for the first generation of chapter `n`.
    pub fn chapter_prompt(&self, n: u32) -> Option<String> {
        let marker = format!("CHAPTER TO WRITE: Chapter {}:", n);
        self.prompts().into_iter().find(|p| p.contains(&marker))
    }

    fn respond(&self, prompt: &str) -> String {
        if prompt.starts_with("Summarize") {
            format!("Summary of chapter {}", number_after(prompt, "CHAPTER "))
        } else if prompt.starts_with("You are revising a chapter") {
            format!("Revised body of chapter {}", number_after(prompt, "CHAPTER "))
        } else if prompt.contains("CHAPTER TO WRITE: Chapter ") {
            format!(
                "## Section\n\nBody of chapter {}",
                number_after(prompt, "CHAPTER TO WRITE: Chapter ")
            )
        } else if prompt.contains("You need to revise a book outline") {
            self.revised_outline.clone()
        } else {
            self.outline.clone()
        }
    }
}

fn number_after(prompt: &str, marker: &str) -> u32 {
    prompt
        .split(marker)
        .nth(1)
        .map(|rest| rest.chars().take_while(char::is_ascii_digit).collect::<String>())
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, req: &GenerateRequest) -> FolioResult<GenerateResponse> {
        self.requests.lock().unwrap().push(req.clone());
        let marker = self.fail_marker.lock().unwrap().clone();
        if marker.is_some_and(|m| req.prompt.contains(&m)) {
            return Err(GenerationError::new(GenerationErrorKind::Api {
                status: 500,
                message: "scripted failure".to_string(),
            })
            .into());
        }
        Ok(GenerateResponse {
            text: self.respond(&req.prompt),
        })
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// Keeps every event it receives.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(PipelineEvent::name).collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, event: &PipelineEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

//! Notifier implementations.

use async_trait::async_trait;
use folio_interface::{Notifier, PipelineEvent};
use std::sync::Arc;

/// Writes every event to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Error { .. } => tracing::error!(
                event = event.name(),
                book_id = %event.book_id(),
                "{}",
                event.message()
            ),
            _ => tracing::info!(
                event = event.name(),
                book_id = %event.book_id(),
                "{}",
                event.message()
            ),
        }
    }
}

/// Posts every event as JSON to a webhook.
///
/// The body is the serialised event with an added `message` field. Delivery
/// failures are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Create a notifier posting to `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Webhook URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// JSON body sent for an event.
    pub fn payload(event: &PipelineEvent) -> serde_json::Value {
        let mut body = serde_json::to_value(event).unwrap_or_else(|_| serde_json::json!({}));
        if let Some(object) = body.as_object_mut() {
            object.insert("message".to_string(), event.message().into());
        }
        body
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    #[tracing::instrument(skip(self, event), fields(event = event.name(), url = %self.url))]
    async fn notify(&self, event: &PipelineEvent) {
        let result = self
            .client
            .post(&self.url)
            .json(&Self::payload(event))
            .send()
            .await
            .and_then(|response| response.error_for_status());
        match result {
            Ok(response) => tracing::debug!(status = %response.status(), "Webhook delivered"),
            Err(e) => tracing::warn!(error = %e, "Webhook delivery failed"),
        }
    }
}

/// Forwards every event to each inner notifier in turn.
#[derive(Clone, Default)]
pub struct FanoutNotifier {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl FanoutNotifier {
    /// Create an empty fan-out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notifier.
    pub fn with(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    /// Number of inner notifiers.
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Whether no notifiers are registered.
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

#[async_trait]
impl Notifier for FanoutNotifier {
    async fn notify(&self, event: &PipelineEvent) {
        for notifier in &self.notifiers {
            notifier.notify(event).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::BookId;

    #[test]
    fn webhook_payload_carries_event_and_message() {
        let event = PipelineEvent::ChapterReady {
            book_id: BookId::new(),
            chapter_number: 3,
        };
        let body = WebhookNotifier::payload(&event);
        assert_eq!(body["event"], "chapter_ready");
        assert_eq!(body["chapter_number"], 3);
        assert_eq!(body["message"], "Chapter 3 has been generated");
    }

    #[tokio::test]
    async fn unreachable_webhook_does_not_fail() {
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/hook");
        notifier
            .notify(&PipelineEvent::BookCompleted {
                book_id: BookId::new(),
            })
            .await;
    }
}

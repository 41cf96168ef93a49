use chrono::Utc;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::ApiClientError;
use crate::models::chat::{ChatOutcome, Role};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

impl ApiClient {
    /// One turn against the task agent. Agent-level failures come back as
    /// `Ok(ChatOutcome::Failure)`; only HTTP/transport problems are `Err`.
    pub async fn send_chat(
        &self,
        user_id: i64,
        message: &str,
    ) -> Result<ChatOutcome, ApiClientError> {
        self.post(&format!("/api/{}/chat", user_id), &ChatRequest { message }, true)
            .await
    }
}

/// One entry in a local chat transcript.
///
/// `correlation_id` is minted client-side before the request goes out and
/// is only ever used to find this entry again; `server_id` is filled in
/// from the backend's reply and is the id that means anything outside
/// this process.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub correlation_id: Uuid,
    pub server_id: Option<i64>,
    pub role: Role,
    pub content: String,
    pub timestamp: String,
    /// False until the backend acknowledged the turn this entry belongs to.
    pub delivered: bool,
}

/// Append-only local transcript for one user's conversation with the task
/// agent. The backend owns the durable conversation; this only tracks what
/// this process sent and received, in order.
pub struct ChatSession {
    client: ApiClient,
    user_id: i64,
    conversation_id: Option<i64>,
    entries: Vec<SessionEntry>,
}

impl ChatSession {
    pub fn new(client: ApiClient, user_id: i64) -> Self {
        Self {
            client,
            user_id,
            conversation_id: None,
            entries: Vec::new(),
        }
    }

    /// Server-side conversation id, known after the first successful turn.
    pub fn conversation_id(&self) -> Option<i64> {
        self.conversation_id
    }

    pub fn entries(&self) -> &[SessionEntry] {
        &self.entries
    }

    /// Transcript as a renderer should see it: tool records filtered out.
    pub fn visible(&self) -> impl Iterator<Item = &SessionEntry> {
        self.entries.iter().filter(|e| e.role != Role::Tool)
    }

    /// Appends the outgoing message, performs the turn, and on success
    /// appends the assistant reply. The user entry stays `delivered: false`
    /// when the turn fails at any level, so callers can re-render it as
    /// unconfirmed.
    pub async fn send(&mut self, message: &str) -> Result<ChatOutcome, ApiClientError> {
        let correlation_id = Uuid::new_v4();
        self.entries.push(SessionEntry {
            correlation_id,
            server_id: None,
            role: Role::User,
            content: message.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            delivered: false,
        });

        let outcome = self.client.send_chat(self.user_id, message).await?;

        match &outcome {
            ChatOutcome::Reply(reply) => {
                if let Some(entry) = self
                    .entries
                    .iter_mut()
                    .find(|e| e.correlation_id == correlation_id)
                {
                    entry.delivered = true;
                }
                self.conversation_id = Some(reply.conversation_id);
                self.entries.push(SessionEntry {
                    correlation_id: Uuid::new_v4(),
                    server_id: Some(reply.message_id),
                    role: Role::Assistant,
                    content: reply.response.clone(),
                    timestamp: reply.timestamp.clone(),
                    delivered: true,
                });
            }
            ChatOutcome::Failure(failure) => {
                warn!("chat agent failure {}: {}", failure.error, failure.message);
            }
        }

        Ok(outcome)
    }
}

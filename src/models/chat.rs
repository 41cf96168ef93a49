use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Internal tool-call records; stored in transcripts but never shown.
    Tool,
}

/// Successful turn from `POST /api/{user_id}/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub success: bool,
    pub response: String,
    pub conversation_id: i64,
    pub message_id: i64,
    pub timestamp: String,
}

/// Agent-level failure. Still a 200 on the wire; `success` is false and
/// the payload describes what went wrong instead of carrying a reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatFailure {
    pub success: bool,
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChatOutcome {
    Reply(ChatReply),
    Failure(ChatFailure),
}

impl ChatOutcome {
    pub fn is_reply(&self) -> bool {
        matches!(self, ChatOutcome::Reply(_))
    }
}

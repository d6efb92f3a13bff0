//! Chat session state for PDF analysis.
//!
//! Tracks the uploaded document, the analysis notes produced by the initial
//! pass, and the running message transcript. Uploading a new document resets
//! the transcript.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Who produced a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn in the conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// State carried across a PDF analysis conversation
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub messages: Vec<ChatMessage>,
    pub pdf_content: Option<String>,
    pub notes: Option<String>,
    pub analysis_started: bool,
}

/// Base64-encode raw PDF bytes for inline upload.
pub fn encode_pdf(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a new document and clear any previous conversation.
    pub fn begin_analysis(&mut self, pdf_base64: String) {
        self.messages.clear();
        self.pdf_content = Some(pdf_base64);
        self.notes = Some(String::new());
        self.analysis_started = true;
    }

    /// Store the full analysis text and append it as the assistant's turn.
    pub fn record_notes(&mut self, notes: String) {
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content: notes.clone(),
        });
        self.notes = Some(notes);
    }

    pub fn push_user(&mut self, content: String) {
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            content,
        });
    }

    pub fn push_assistant(&mut self, content: String) {
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content,
        });
    }

    /// Notes for prompt assembly; empty until the analysis has run.
    pub fn notes_or_empty(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}

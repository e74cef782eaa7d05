use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::AppResult;
use crate::models::ChatMessage;
use crate::services::chat_client::{accumulate_fragments, ChatCompletion};
use crate::services::prompts::SYSTEM_PROMPT;

/// Sends résumé text to the chat backend and collects the full reply.
pub struct ResumeAnalyzer {
    chat: Arc<dyn ChatCompletion>,
    timeout: Duration,
}

impl ResumeAnalyzer {
    pub fn new(chat: Arc<dyn ChatCompletion>, timeout: Duration) -> Self {
        Self { chat, timeout }
    }

    /// The system prompt followed by the résumé as the only user message.
    pub fn build_messages(resume_text: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(resume_text),
        ]
    }

    /// Streams the analysis and returns it once the stream is exhausted.
    ///
    /// Opening the stream and draining it share one deadline; on expiry the
    /// call fails with [`crate::error::AppError::Timeout`] and any partial
    /// reply is dropped.
    pub async fn analyze(&self, resume_text: &str) -> AppResult<String> {
        let start = Instant::now();
        let messages = Self::build_messages(resume_text);

        let reply = tokio::time::timeout(self.timeout, async {
            let fragments = self.chat.stream_chat(messages).await?;
            accumulate_fragments(fragments).await
        })
        .await??;

        tracing::info!(
            reply_length = reply.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Chat completion finished"
        );

        Ok(reply)
    }
}

use anyhow::Result;
use async_trait::async_trait;

use dokkan_core::domain::chat::ChatMessage;

/// One persona-reply request: the whole transcript plus the storefront
/// briefing the assistant answers from.
pub struct ReplyRequest<'a> {
    pub transcript: &'a [ChatMessage],
    pub system_instruction: &'a str,
    pub temperature: f32,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn generate_reply(&self, request: ReplyRequest<'_>) -> Result<String>;

    /// Screens free text for an order intent. `Ok(None)` means the model
    /// answered but produced nothing usable; transport failures are `Err`.
    async fn extract_order(&self, transcript_text: &str)
        -> Result<Option<crate::extraction::ExtractedOrder>>;
}

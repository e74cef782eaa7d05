use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
        CreateChatCompletionStreamResponse,
    },
    Client,
};
use async_trait::async_trait;
use futures::stream::{BoxStream, Stream, StreamExt};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{ChatMessage, ChatRole};
use crate::services::prompts::MODEL;

/// Text deltas of one streamed reply, in arrival order. Finite and consumable
/// once.
pub type FragmentStream = BoxStream<'static, AppResult<String>>;

/// A chat-completion backend that answers with a stream of text fragments.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn stream_chat(&self, messages: Vec<ChatMessage>) -> AppResult<FragmentStream>;
}

/// Streaming client for any OpenAI-compatible chat completions endpoint.
pub struct OpenAiChatClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(api_key: &str, api_base: &str) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);

        Self {
            client: Client::with_config(openai_config),
            model: MODEL.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.gemini_api_key, &config.gemini_base_url)
    }
}

#[async_trait]
impl ChatCompletion for OpenAiChatClient {
    async fn stream_chat(&self, messages: Vec<ChatMessage>) -> AppResult<FragmentStream> {
        let openai_messages = messages
            .into_iter()
            .map(into_openai_message)
            .collect::<AppResult<Vec<_>>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(openai_messages)
            .stream(true)
            .build()?;

        tracing::debug!(
            model = %self.model,
            messages_count = request.messages.len(),
            "Opening chat completion stream"
        );

        let stream = self.client.chat().create_stream(request).await?;

        Ok(stream
            .map(|chunk| chunk.map(fragment_text).map_err(AppError::from))
            .boxed())
    }
}

fn into_openai_message(message: ChatMessage) -> AppResult<ChatCompletionRequestMessage> {
    let converted: ChatCompletionRequestMessage = match message.role {
        ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(message.content)
            .build()?
            .into(),
        ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(message.content)
            .build()?
            .into(),
    };
    Ok(converted)
}

/// Content of the first choice's delta. Chunks without a choice or without
/// content (role-only openers, usage trailers) contribute nothing.
fn fragment_text(chunk: CreateChatCompletionStreamResponse) -> String {
    chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .unwrap_or_default()
}

/// Drains `stream` to exhaustion, concatenating fragments in arrival order.
/// The first failed fragment aborts the whole reply.
pub async fn accumulate_fragments<S>(stream: S) -> AppResult<String>
where
    S: Stream<Item = AppResult<String>>,
{
    futures::pin_mut!(stream);

    let mut reply = String::new();
    let mut fragments = 0usize;

    while let Some(fragment) = stream.next().await {
        reply.push_str(&fragment?);
        fragments += 1;
    }

    tracing::debug!(fragments, reply_length = reply.len(), "Chat completion stream exhausted");

    Ok(reply)
}

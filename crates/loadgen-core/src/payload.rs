use bytes::Bytes;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// OpenAI-compatible chat request body, non-streaming.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub stream: bool,
}

impl<'a> ChatCompletionRequest<'a> {
    pub fn single_prompt(model: &'a str, prompt: &'a str, max_tokens: u32) -> Self {
        Self {
            model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            max_tokens,
            stream: false,
        }
    }
}

/// Encodes the request once; every worker shares the same buffer.
pub fn make_payload(model: &str, prompt: &str, max_tokens: u32) -> loadgen_common::Result<Bytes> {
    let body = serde_json::to_vec(&ChatCompletionRequest::single_prompt(model, prompt, max_tokens))?;
    Ok(Bytes::from(body))
}

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::models::{ChatRequest, ConversationTurn, DEFAULT_LANGUAGE_CODE};

/// Longest slice of an upstream error body kept for the logs.
const MAX_LOGGED_BODY: usize = 512;

#[derive(Debug, Error)]
pub enum ChatProxyError {
    #[error("invalid chat endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("chat backend did not answer within {0:?}")]
    Timeout(Duration),

    #[error("chat backend request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("chat backend returned status {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("chat backend returned an invalid reply: {0}")]
    Decode(String),
}

/// Body posted to the external chat backend.
#[derive(Debug, Serialize)]
struct OutboundChat<'a> {
    message: &'a str,
    language: &'a str,
    conversation_history: &'a [ConversationTurn],
    tool_name: Option<&'a str>,
}

impl<'a> From<&'a ChatRequest> for OutboundChat<'a> {
    fn from(request: &'a ChatRequest) -> Self {
        OutboundChat {
            message: &request.message,
            language: request
                .language
                .as_deref()
                .filter(|l| !l.trim().is_empty())
                .unwrap_or(DEFAULT_LANGUAGE_CODE),
            conversation_history: &request.conversation_history,
            tool_name: request.tool_name.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamReply {
    response: String,
}

/// Forwards chat requests to the external natural-language backend.
///
/// One attempt per call, bounded by the client timeout. Holds no
/// conversation state.
#[derive(Debug, Clone)]
pub struct ChatProxy {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl ChatProxy {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, ChatProxyError> {
        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join("api/chat")?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ChatProxyError::Client)?;

        Ok(ChatProxy { client, endpoint, timeout })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends the request with defaults applied and returns the backend's
    /// `response` text untouched.
    pub async fn forward(&self, request: &ChatRequest) -> Result<String, ChatProxyError> {
        let body = OutboundChat::from(request);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = read_capped(response, MAX_LOGGED_BODY).await;
            return Err(ChatProxyError::Status { status, body });
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        let reply: UpstreamReply =
            serde_json::from_slice(&bytes).map_err(|e| ChatProxyError::Decode(e.to_string()))?;

        Ok(reply.response)
    }

    fn classify(&self, error: reqwest::Error) -> ChatProxyError {
        if error.is_timeout() {
            ChatProxyError::Timeout(self.timeout)
        } else {
            ChatProxyError::Transport(error)
        }
    }
}

/// Reads at most `max` bytes of the body, stopping at the first chunk past
/// the cap. Read failures leave whatever was collected so far.
async fn read_capped(mut response: reqwest::Response, max: usize) -> String {
    let mut collected: Vec<u8> = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let room = max.saturating_sub(collected.len());
                collected.extend_from_slice(&chunk[..chunk.len().min(room)]);
                if collected.len() >= max {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!("Failed to read chat backend error body: {}", e);
                break;
            }
        }
    }

    let mut text = String::from_utf8_lossy(&collected).into_owned();
    truncate_at_char_boundary(&mut text, max);
    text
}

fn truncate_at_char_boundary(text: &mut String, max: usize) {
    if text.len() > max {
        let mut end = max;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
}

use serde::{Deserialize, Deserializer, Serialize};

/// One prior turn of a conversation, supplied by the caller on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    #[serde(alias = "from")]
    pub sender: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub conversation_history: Vec<ConversationTurn>,
    #[serde(default)]
    pub tool_name: Option<String>,
}

/// Treats an explicit `null` like a missing key.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

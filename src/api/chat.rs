use salvo::prelude::*;

use crate::models::{ChatRequest, ChatResponse};
use crate::utils::middleware::app_state;
use crate::utils::AppError;

/// `POST /api/chat`: relays one chat turn to the external backend.
#[handler]
pub async fn handle_chat(req: &mut Request, depot: &mut Depot, res: &mut Response) -> Result<(), AppError> {
    let state = app_state(depot)?.clone();
    let chat_request: ChatRequest = req.parse_json().await.map_err(|e| {
        tracing::debug!("Unparsable chat request: {}", e);
        AppError::Validation("Invalid request body".to_string())
    })?;

    if chat_request.message.trim().is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }

    tracing::info!(
        "Forwarding chat request (language={:?}, history={}, tool={:?}, chars={})",
        chat_request.language,
        chat_request.conversation_history.len(),
        chat_request.tool_name,
        chat_request.message.chars().count()
    );

    let response = state.chat.forward(&chat_request).await?;

    res.render(Json(ChatResponse { response }));
    Ok(())
}

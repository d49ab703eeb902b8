use salvo::prelude::*;
use thiserror::Error;

use crate::core::catalog::CatalogError;
use crate::core::chat_proxy::ChatProxyError;

pub const CHAT_UNAVAILABLE_MESSAGE: &str = "Chat service is temporarily unavailable";
pub const CATALOG_UNAVAILABLE_MESSAGE: &str = "Failed to load tools";

/// Errors surfaced at the HTTP boundary.
///
/// `Display` is what the caller sees; upstream and catalog failures keep
/// their detail in the wrapped source, which is only written to the log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Chat service is temporarily unavailable")]
    UpstreamUnavailable(#[source] ChatProxyError),

    #[error("Failed to load tools")]
    CatalogUnavailable(#[source] CatalogError),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        match self {
            AppError::UpstreamUnavailable(source) => {
                tracing::error!("Chat backend call failed: {}", source);
            }
            AppError::CatalogUnavailable(source) => {
                tracing::error!("Tool catalog unavailable: {}", source);
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
            }
            AppError::Validation(msg) | AppError::NotFound(msg) => {
                tracing::debug!("Rejected request: {}", msg);
            }
        }
    }
}

impl From<ChatProxyError> for AppError {
    fn from(err: ChatProxyError) -> Self {
        AppError::UpstreamUnavailable(err)
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::CatalogUnavailable(err)
    }
}

#[async_trait]
impl Writer for AppError {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        self.log();
        res.status_code(self.status_code());
        res.render(Json(serde_json::json!({
            "error": self.to_string()
        })));
    }
}

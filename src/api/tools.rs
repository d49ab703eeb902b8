use salvo::prelude::*;

use crate::core::catalog::{decorate, decorate_all, ToolFilter};
use crate::models::Language;
use crate::utils::middleware::app_state;
use crate::utils::AppError;

fn query_text(req: &Request, key: &str) -> Option<String> {
    req.query::<String>(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `GET /api/tools?language=&search=&category=`
#[handler]
pub async fn list_tools(req: &mut Request, depot: &mut Depot, res: &mut Response) -> Result<(), AppError> {
    let state = app_state(depot)?.clone();
    let language = Language::from_code(query_text(req, "language").as_deref());
    let filter = ToolFilter {
        search: query_text(req, "search"),
        category: query_text(req, "category"),
    };

    let descriptors = state.catalog.descriptors().await?;
    let mut tools = decorate_all(&descriptors, language, &state.categories, state.popularity.as_ref());
    if !filter.is_empty() {
        tools.retain(|tool| filter.matches(tool));
    }

    tracing::info!(
        "Serving {} of {} tools (language={})",
        tools.len(),
        descriptors.len(),
        language
    );
    res.render(Json(tools));
    Ok(())
}

/// `GET /api/tools/{slug}?language=`
#[handler]
pub async fn get_tool(req: &mut Request, depot: &mut Depot, res: &mut Response) -> Result<(), AppError> {
    let state = app_state(depot)?.clone();
    let slug = req
        .param::<String>("slug")
        .ok_or_else(|| AppError::Validation("Tool slug is required".to_string()))?;
    let language = Language::from_code(query_text(req, "language").as_deref());

    let descriptors = state.catalog.descriptors().await?;
    let descriptor = descriptors
        .iter()
        .find(|d| d.slug() == slug)
        .ok_or_else(|| AppError::NotFound("Tool not found".to_string()))?;

    let tool = decorate(descriptor, language, &state.categories, state.popularity.sample());
    res.render(Json(tool));
    Ok(())
}

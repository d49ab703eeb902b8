pub mod chat;
pub mod health;
pub mod tools;

use salvo::cors::{AllowHeaders, AllowMethods, AllowOrigin, Cors};
use salvo::prelude::*;
use salvo::serve_static::StaticDir;

use crate::utils::middleware::inject_state;
use crate::utils::AppState;

/// Routes mounted under `/api`.
pub fn api_routes() -> Router {
    Router::new()
        .push(Router::with_path("health").get(health::health_check))
        .push(Router::with_path("chat").post(chat::handle_chat))
        .push(Router::with_path("tools").get(tools::list_tools))
        .push(Router::with_path("tools/{slug}").get(tools::get_tool))
}

pub fn router(state: AppState) -> Router {
    let static_path = state.config.static_files_path.clone();

    let mut router = Router::new().push(
        Router::with_path("api")
            .hoop(inject_state(state))
            .push(api_routes()),
    );

    if let Some(static_path) = static_path {
        tracing::info!("Serving frontend from {}", static_path.display());
        let assets_service = StaticDir::new(static_path)
            .include_dot_files(false)
            .fallback("index.html");
        router = router.push(Router::with_path("{**path}").get(assets_service));
    }

    router
}

/// The full service: router plus permissive CORS, which has to run before
/// routing so preflight requests are answered.
pub fn service(state: AppState) -> Service {
    let cors = Cors::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(AllowMethods::any())
        .allow_headers(AllowHeaders::any())
        .into_handler();

    Service::new(router(state)).hoop(cors)
}

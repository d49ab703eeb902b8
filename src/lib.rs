// Student AI Backend Library
// Tool catalog and chat proxy endpoints for the student AI assistant

pub mod api;
pub mod core;
pub mod models;
pub mod utils;

pub use utils::{AppError, AppState, Config};

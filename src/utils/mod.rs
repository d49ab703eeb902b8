pub mod config;
pub mod error;
pub mod middleware;
pub mod state;

pub use config::*;
pub use error::*;
pub use state::*;

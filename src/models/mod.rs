pub mod chat;
pub mod language;
pub mod tool;

pub use chat::*;
pub use language::*;
pub use tool::*;

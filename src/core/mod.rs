pub mod catalog;
pub mod categories;
pub mod chat_proxy;
pub mod popularity;

pub mod chat_proxy;
pub mod db;
pub mod gemini;

pub use chat_proxy::ProxyTransport;
pub use db::DbAdapter;
pub use gemini::{GeminiAdapter, GeminiConfig};

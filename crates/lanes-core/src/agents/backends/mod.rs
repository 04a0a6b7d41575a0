//! Agent backend implementations.

mod claude;
mod codex;

pub use claude::ClaudeBackend;
pub use codex::CodexBackend;

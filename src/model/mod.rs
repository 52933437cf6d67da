mod config;
mod scripted;

pub use config::*;
pub use scripted::*;

/// The single abstraction agents use to reach a language model. One
/// prompt in, one completion out; transport, auth, and retry live
/// entirely behind the implementation. Calls are cancelled by dropping
/// the future, which the pool does on shutdown.
#[async_trait::async_trait]
pub trait Model: Send + Sync {
    async fn call(&self, prompt: &str) -> anyhow::Result<String>;
}

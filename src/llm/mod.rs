pub mod config;
pub mod factory;
pub mod message;
pub mod provider;
pub mod providers;

pub use config::{ProviderKind, ProviderSettings};
pub use factory::create_provider;
pub use message::{ChatMessage, GenerateOptions, GenerationResult, Role};
pub use provider::{LlmError, LlmProvider};

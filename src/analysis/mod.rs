pub mod prompts;
pub mod service;
pub mod types;

pub use prompts::{build_control_prompt, PromptVariant};
pub use service::{AnalysisError, ControlAnalysisService};
pub use types::{ControlAnalysisInput, ControlAnalysisResult};

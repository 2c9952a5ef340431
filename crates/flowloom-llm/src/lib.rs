mod client;
mod error;
mod extract;
mod generate;
mod prompt;
mod types;


pub use client::{
    ENGINE_HOSTED, ENGINE_LOCAL, HostedBackend, LlmConfig, LocalBackend, ModelBackend,
};
pub use error::GenerateError;
pub use extract::extract_json_object;
pub use generate::{Generator, generate_with_backend};
pub use prompt::{build_user_prompt, workflow_system_prompt};
pub use types::*;

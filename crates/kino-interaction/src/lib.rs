//! Completion API clients.

pub mod deepseek_api_agent;
pub mod providers;
pub mod system_prompt;

pub use deepseek_api_agent::DeepSeekApiAgent;
pub use providers::create_completion_client;
pub use system_prompt::build_system_prompt;

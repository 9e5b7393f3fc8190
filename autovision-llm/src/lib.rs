pub mod config;
pub mod error;
pub mod identifier;
pub mod parse;
pub mod providers;

#[cfg(test)]
mod providers_tests;

pub use config::{IdentificationConfig, API_KEY_ENV_VARS};
pub use error::{LLMError, Result};
pub use identifier::VehicleIdentifier;
pub use parse::{parse_identity_reply, strip_code_fences};
pub use providers::{GoogleProvider, IdentificationProvider, StaticProvider};

//! Sift library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod core;
pub mod inference;

#[cfg(test)]
pub mod test_support;

/// Call strategy used to obtain a completion for a model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Structured chat-completion call.
    #[default]
    Native,
    /// Hand-built completion request against a configured endpoint.
    RawHttp,
}

impl Provider {
    pub fn label(self) -> &'static str {
        match self {
            Provider::Native => "native",
            Provider::RawHttp => "raw-http",
        }
    }
}

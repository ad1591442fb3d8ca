//! # Core Application Logic
//!
//! Everything around the provider calls: composing prompts, fanning them
//! out, and the collaborators a front end needs on either side.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!   config ──► credential ──┐
//!                           ▼
//!   text + prompts ──► dispatcher ──► inference (resolver, invoker)
//!                           │
//!                           ▼
//!                        render
//! ```
//!
//! ## Modules
//!
//! - [`dispatcher`]: the `Dispatcher`, one result per prompt, in order
//! - [`prompt`]: default prompts and prompt composition
//! - [`config`]: `~/.sift/config.toml` and env overrides
//! - [`credential`]: API key lookup across sources
//! - [`render`]: titled result blocks

pub mod config;
pub mod credential;
pub mod dispatcher;
pub mod prompt;
pub mod render;

pub use dispatcher::{DispatchMode, Dispatcher};

//! colloquy - conversation loop for chat-completion APIs
//!
//! This library drives a multi-turn exchange with a remote model: it keeps
//! the conversation history, translates it to the provider's wire format,
//! and runs the tools the model asks for, feeding their results back in.

pub mod config;
pub mod error;
pub mod session;
pub mod source;
pub mod tools;
pub mod translator;
pub mod transport;
pub mod ui;

pub use error::{Error, Result};

//! Session module — conversation orchestration.
//!
//! This module contains:
//! - Message types ([`Message`], [`MessageType`], [`ToolCallRecord`])
//! - The default configuration template ([`Defaults`])
//! - Directive parsing for `#`-prefixed source lines
//! - The pending-result queue
//! - [`Session`], which drives the request/response/tool-dispatch loop

mod defaults;
mod directive;
mod loop_impl;
mod message;
mod queue;

pub use defaults::{Defaults, DEFAULT_TRANSLATOR};
pub use directive::Directive;
pub use loop_impl::Session;
pub use message::{Message, MessageType, ToolCallRecord};
pub use queue::PendingQueue;

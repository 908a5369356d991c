//! Document state management and text utilities.
//!
//! This module provides:
//! - `LineIndex` for byte offset <-> LSP position conversion
//! - `CallSite` extraction for calls to catalogue functions
//! - `DocumentState` and `DocumentStore` for document lifecycle management

mod calls;
mod state;
mod text;

pub use calls::{extract_calls, Argument, CallSite};
pub use state::{DocumentState, DocumentStore};
pub use text::LineIndex;

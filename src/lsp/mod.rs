//! LSP protocol feature implementations.
//!
//! This module provides implementations for LSP features:
//! - Diagnostics for calls that match no documented overload
//! - Hover documentation for catalogue function names
//! - Completion of catalogue function names
//! - Signature help inside calls

mod completion;
mod diagnostics;
mod hover;
mod signature_help;

pub use completion::completion_at_position;
pub use diagnostics::to_diagnostics;
pub use hover::{format_function_docs, hover_at_position};
pub use signature_help::signature_help_at_position;

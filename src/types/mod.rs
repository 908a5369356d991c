//! Function descriptors and the registry that holds them.
//!
//! This module provides:
//! - `FunctionDescriptor`, `Signature`, `Param` and `ReturnDesc` describing
//!   how a remote function is called
//! - `FunctionRegistry`, a name-keyed, insertion-ordered collection
//! - The built-in catalogue of documented platform functions

mod builtins;
mod function;
mod registry;

pub use builtins::{
    builtin_descriptors, get_builtin, help_url_for, is_builtin, BUILTINS, DEFAULT_HELP_BASE_URL,
};
pub use function::{FunctionDescriptor, Param, ReturnDesc, Signature};
pub use registry::{FunctionRegistry, Names, RegistryError};

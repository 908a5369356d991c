//! Name-keyed registry of function descriptors.
//!
//! The registry is populated once (builtins plus any configured catalogue
//! files) and is read-only afterwards. Insertion order is preserved so that
//! listings and generated indexes are stable.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::function::FunctionDescriptor;

/// Function names are plain identifiers, optionally containing `$`.
static IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z$][A-Za-z0-9$]*$").unwrap());

/// Errors raised by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("function '{name}' is already registered")]
    DuplicateName { name: String },

    #[error("function '{name}' is not registered")]
    NotFound { name: String },

    #[error("invalid descriptor for '{name}': {reason}")]
    InvalidDescriptor { name: String, reason: String },
}

/// Ordered collection of function descriptors with unique names.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    descriptors: Vec<FunctionDescriptor>,
    index: HashMap<String, usize>,
}

impl FunctionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor.
    ///
    /// Fails with `DuplicateName` if the name is already present, whatever the
    /// new descriptor contains. Otherwise fails with `InvalidDescriptor` if it
    /// has no name, no signatures, an overload without a return description,
    /// or no help URL.
    pub fn register(&mut self, descriptor: FunctionDescriptor) -> Result<(), RegistryError> {
        if self.index.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateName {
                name: descriptor.name,
            });
        }
        validate(&descriptor)?;

        tracing::trace!(name = %descriptor.name, "registering function");
        self.index
            .insert(descriptor.name.clone(), self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Look up a descriptor by exact name.
    pub fn lookup(&self, name: &str) -> Result<&FunctionDescriptor, RegistryError> {
        self.get(name).ok_or_else(|| RegistryError::NotFound {
            name: name.to_string(),
        })
    }

    /// Look up a descriptor by exact name, if present.
    pub fn get(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.index.get(name).map(|&i| &self.descriptors[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// All registered names, in insertion order.
    ///
    /// Each call returns a fresh iterator; the iterator can also be cloned to
    /// walk the names again.
    pub fn names(&self) -> Names<'_> {
        Names {
            inner: self.descriptors.iter(),
        }
    }

    /// All descriptors, in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, FunctionDescriptor> {
        self.descriptors.iter()
    }

    /// Descriptors whose name starts with `prefix`, ignoring ASCII case.
    ///
    /// An empty prefix matches everything.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a FunctionDescriptor> + 'a {
        let prefix = prefix.to_ascii_lowercase();
        self.descriptors
            .iter()
            .filter(move |d| d.name.to_ascii_lowercase().starts_with(&prefix))
    }
}

impl<'a> IntoIterator for &'a FunctionRegistry {
    type Item = &'a FunctionDescriptor;
    type IntoIter = std::slice::Iter<'a, FunctionDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over registered function names.
#[derive(Debug, Clone)]
pub struct Names<'a> {
    inner: std::slice::Iter<'a, FunctionDescriptor>,
}

impl<'a> Iterator for Names<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|d| d.name.as_str())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Names<'_> {}

/// Check a descriptor against the registry invariants.
fn validate(descriptor: &FunctionDescriptor) -> Result<(), RegistryError> {
    let invalid = |reason: &str| RegistryError::InvalidDescriptor {
        name: descriptor.name.clone(),
        reason: reason.to_string(),
    };

    if descriptor.name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if !IDENTIFIER_PATTERN.is_match(&descriptor.name) {
        return Err(invalid("name is not an identifier"));
    }
    if descriptor.signatures.is_empty() {
        return Err(invalid("no signatures"));
    }
    if let Some(pos) = descriptor
        .signatures
        .iter()
        .position(|sig| !sig.returns.is_complete())
    {
        return Err(invalid(&format!(
            "signature {} has no return description",
            pos + 1
        )));
    }
    if descriptor.help_url.trim().is_empty() {
        return Err(invalid("help URL is empty"));
    }
    Ok(())
}

//! Catalogue files: descriptors authored in TOML.
//!
//! A catalogue file holds a list of `[[function]]` tables, each with one or
//! more `[[function.signature]]` tables. Help links may be omitted and are
//! then derived from the configured base URL.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::types::{
    help_url_for, FunctionDescriptor, FunctionRegistry, Param, RegistryError, ReturnDesc,
    Signature,
};

/// Errors raised while loading a catalogue file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalogue '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalogue '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Root of a catalogue file.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogFile {
    #[serde(default, rename = "function")]
    pub functions: Vec<CatalogEntry>,
}

/// One `[[function]]` table.
#[derive(Debug, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub summary: Option<String>,
    pub category: Option<String>,
    pub help_url: Option<String>,
    #[serde(default, rename = "signature")]
    pub signatures: Vec<CatalogSignature>,
}

/// One `[[function.signature]]` table.
#[derive(Debug, Deserialize)]
pub struct CatalogSignature {
    #[serde(default)]
    pub params: Vec<CatalogText>,
    pub returns: CatalogText,
    #[serde(default = "default_accepts_options")]
    pub accepts_options: bool,
}

/// A `{ name, description }` inline table.
#[derive(Debug, Deserialize)]
pub struct CatalogText {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

fn default_accepts_options() -> bool {
    true
}

impl CatalogEntry {
    /// Convert into a descriptor, deriving the help link when absent.
    pub fn into_descriptor(self, help_base_url: &str) -> FunctionDescriptor {
        let help_url = self
            .help_url
            .unwrap_or_else(|| help_url_for(help_base_url, &self.name));
        let mut descriptor = FunctionDescriptor::new(self.name, help_url);
        descriptor.summary = self.summary;
        descriptor.category = self.category;
        descriptor.signatures = self
            .signatures
            .into_iter()
            .map(|sig| Signature {
                params: sig
                    .params
                    .into_iter()
                    .map(|p| Param::new(p.name, p.description))
                    .collect(),
                accepts_options: sig.accepts_options,
                returns: ReturnDesc::new(sig.returns.name, sig.returns.description),
            })
            .collect();
        descriptor
    }
}

/// Parse catalogue text into descriptors.
pub fn parse_catalog(
    content: &str,
    help_base_url: &str,
) -> Result<Vec<FunctionDescriptor>, toml::de::Error> {
    let file: CatalogFile = toml::from_str(content)?;
    Ok(file
        .functions
        .into_iter()
        .map(|entry| entry.into_descriptor(help_base_url))
        .collect())
}

/// Read and parse a catalogue file.
pub fn load_catalog_file(
    path: &Path,
    help_base_url: &str,
) -> Result<Vec<FunctionDescriptor>, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&content, help_base_url).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Register every descriptor, returning the ones that were rejected.
///
/// Registration continues past failures; earlier registrations win.
pub fn extend_registry(
    registry: &mut FunctionRegistry,
    descriptors: impl IntoIterator<Item = FunctionDescriptor>,
) -> Vec<RegistryError> {
    descriptors
        .into_iter()
        .filter_map(|descriptor| registry.register(descriptor).err())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.org/help";

    const CATALOG: &str = r#"
[[function]]
name = "ExperimentFoo"
summary = "Generates a protocol for foo."
category = "Experiment"

[[function.signature]]
params = [{ name = "Samples", description = "The samples to foo." }]
returns = { name = "Protocol", description = "The foo protocol." }

[[function.signature]]
params = [
    { name = "Samples", description = "The samples to foo." },
    { name = "Reagent", description = "The foo reagent." },
]
returns = { name = "Protocol", description = "The foo protocol." }
accepts_options = false

[[function]]
name = "PlotFoo"
help_url = "https://elsewhere.org/plotfoo"

[[function.signature]]
returns = { name = "Plot", description = "A foo plot." }
"#;

    #[test]
    fn parses_functions_and_signatures() {
        let descriptors = parse_catalog(CATALOG, BASE).unwrap();
        assert_eq!(descriptors.len(), 2);

        let foo = &descriptors[0];
        assert_eq!(foo.name, "ExperimentFoo");
        assert_eq!(foo.category.as_deref(), Some("Experiment"));
        assert_eq!(foo.signatures.len(), 2);
        assert!(foo.signatures[0].accepts_options);
        assert!(!foo.signatures[1].accepts_options);
        assert_eq!(foo.signatures[1].params[1].name, "Reagent");
        assert_eq!(foo.help_url, "https://example.org/help/experimentfoo");
    }

    #[test]
    fn explicit_help_url_is_kept() {
        let descriptors = parse_catalog(CATALOG, BASE).unwrap();
        let plot = &descriptors[1];
        assert_eq!(plot.help_url, "https://elsewhere.org/plotfoo");
        assert!(plot.signatures[0].params.is_empty());
        assert!(plot.summary.is_none());
    }

    #[test]
    fn empty_catalog_has_no_functions() {
        assert!(parse_catalog("", BASE).unwrap().is_empty());
    }

    #[test]
    fn malformed_catalog_fails() {
        assert!(parse_catalog("[[function]]\nsummary = 3", BASE).is_err());
    }

    #[test]
    fn extend_registry_reports_rejections() {
        let mut registry = FunctionRegistry::new();
        let mut descriptors = parse_catalog(CATALOG, BASE).unwrap();
        descriptors.extend(parse_catalog(CATALOG, BASE).unwrap());

        let rejected = extend_registry(&mut registry, descriptors);
        assert_eq!(registry.len(), 2);
        assert_eq!(rejected.len(), 2);
        assert!(rejected
            .iter()
            .all(|e| matches!(e, RegistryError::DuplicateName { .. })));
    }

    #[test]
    fn entry_without_signatures_is_rejected() {
        let mut registry = FunctionRegistry::new();
        let descriptors = parse_catalog("[[function]]\nname = \"Lonely\"\n", BASE).unwrap();
        let rejected = extend_registry(&mut registry, descriptors);
        assert!(matches!(
            rejected.as_slice(),
            [RegistryError::InvalidDescriptor { .. }]
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_catalog_file(Path::new("/nonexistent/catalog.toml"), BASE).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}

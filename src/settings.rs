//! Settings infrastructure for labsp.
//!
//! This module loads `settings.toml` files that choose which function
//! catalogues make up the registry and how help links are formed.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::catalog::{extend_registry, load_catalog_file};
use crate::types::{builtin_descriptors, FunctionRegistry, DEFAULT_HELP_BASE_URL};

/// Name of the settings file looked up in the workspace.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Root settings structure loaded from settings.toml.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Catalogue configuration.
    pub catalog: Option<CatalogSettings>,
}

/// Settings for assembling the function registry.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogSettings {
    /// Whether to include the built-in catalogue (default: true).
    pub builtins: Option<bool>,

    /// Catalogue files, relative to the directory holding settings.toml.
    pub files: Option<Vec<PathBuf>>,

    /// Base URL that derived help links are placed under.
    pub help_base_url: Option<String>,
}

impl Settings {
    /// Whether the built-in catalogue should be registered.
    pub fn include_builtins(&self) -> bool {
        self.catalog
            .as_ref()
            .and_then(|c| c.builtins)
            .unwrap_or(true)
    }

    /// The configured help base URL, or the default.
    pub fn help_base_url(&self) -> &str {
        self.catalog
            .as_ref()
            .and_then(|c| c.help_base_url.as_deref())
            .unwrap_or(DEFAULT_HELP_BASE_URL)
    }

    /// The configured catalogue files, in order.
    pub fn catalog_files(&self) -> &[PathBuf] {
        self.catalog
            .as_ref()
            .and_then(|c| c.files.as_deref())
            .unwrap_or(&[])
    }
}

/// Load settings from a settings.toml file.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("failed to parse {}: {}", path.display(), e);
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    }
}

/// Discover settings.toml by searching up the directory tree, then direct children.
///
/// Search order:
/// 1. Walk up from `start_dir` to filesystem root
/// 2. If not found, check immediate child directories of `start_dir`
///
/// Returns `(settings, settings_dir)` where `settings_dir` is the directory
/// containing the found settings.toml (used for resolving catalogue paths).
/// If not found, returns `(Settings::default(), start_dir)`.
pub fn discover_settings(start_dir: &Path) -> (Settings, PathBuf) {
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        let candidate = dir.join(SETTINGS_FILE);
        if candidate.is_file() {
            tracing::debug!("using settings from {}", candidate.display());
            return (load_settings(&candidate), dir.to_path_buf());
        }
        current = dir.parent();
    }

    if let Ok(entries) = std::fs::read_dir(start_dir) {
        for entry in entries.flatten() {
            if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
                let candidate = entry.path().join(SETTINGS_FILE);
                if candidate.is_file() {
                    tracing::debug!("using settings from {}", candidate.display());
                    return (load_settings(&candidate), entry.path());
                }
            }
        }
    }

    (Settings::default(), start_dir.to_path_buf())
}

/// Build the function registry described by `settings`.
///
/// Builtins come first (unless disabled), then each catalogue file in the
/// order listed. Unreadable files, duplicate names and invalid descriptors
/// are logged and skipped, so the first definition of a name wins.
pub fn build_registry(settings: &Settings, settings_dir: &Path) -> FunctionRegistry {
    let mut registry = FunctionRegistry::new();
    let base_url = settings.help_base_url();

    if settings.include_builtins() {
        for e in extend_registry(&mut registry, builtin_descriptors(base_url)) {
            tracing::error!("invalid builtin descriptor: {}", e);
        }
    }

    for path in settings.catalog_files() {
        let full_path = if path.is_absolute() {
            path.clone()
        } else {
            settings_dir.join(path)
        };

        match load_catalog_file(&full_path, base_url) {
            Ok(descriptors) => {
                for e in extend_registry(&mut registry, descriptors) {
                    tracing::warn!("skipping entry in {}: {}", full_path.display(), e);
                }
            }
            Err(e) => {
                tracing::warn!("{}: {}", e, error_source(&e));
            }
        }
    }

    tracing::debug!(functions = registry.len(), "function registry built");
    registry
}

/// Discover settings from `start_dir` and build the registry they describe.
pub fn discover_registry(start_dir: &Path) -> FunctionRegistry {
    let (settings, settings_dir) = discover_settings(start_dir);
    build_registry(&settings, &settings_dir)
}

fn error_source(e: &dyn std::error::Error) -> String {
    e.source().map(|s| s.to_string()).unwrap_or_default()
}

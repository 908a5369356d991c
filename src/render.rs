//! Markdown help pages generated from the registry.

use std::fmt::Write as _;
use std::io;
use std::path::Path;

use crate::types::{FunctionDescriptor, FunctionRegistry, Signature};

/// Heading used for descriptors without a category.
const UNCATEGORIZED: &str = "Other";

/// Render the full help page for one descriptor.
pub fn descriptor_markdown(descriptor: &FunctionDescriptor) -> String {
    let mut doc = format!("# {}\n", descriptor.name);
    if let Some(summary) = &descriptor.summary {
        let _ = write!(doc, "\n{}\n", summary);
    }

    doc.push_str("\n## Usage\n");
    for sig in &descriptor.signatures {
        doc.push('\n');
        doc.push_str(&signature_markdown(&descriptor.name, sig));
    }

    let _ = write!(doc, "\n[Full documentation]({})\n", descriptor.help_url);
    doc
}

/// Render one overload: call form, parameter table, return value and options.
pub fn signature_markdown(function: &str, sig: &Signature) -> String {
    let mut doc = format!(
        "### `{}` → `{}`\n\n",
        sig.call_form(function),
        sig.returns.name
    );

    if !sig.params.is_empty() {
        doc.push_str("| Parameter | Description |\n|---|---|\n");
        for param in &sig.params {
            let _ = writeln!(
                doc,
                "| `{}` | {} |",
                param.name,
                escape_cell(&param.description)
            );
        }
        doc.push('\n');
    }

    let _ = writeln!(
        doc,
        "**Returns** `{}`: {}",
        sig.returns.name, sig.returns.description
    );
    if sig.accepts_options {
        doc.push_str("\nAccepts options as trailing `OptionName -> value` rules.\n");
    }
    doc
}

/// Render an index of every descriptor, grouped by category.
///
/// Categories appear in the order they are first seen in the registry.
pub fn index_markdown(registry: &FunctionRegistry) -> String {
    let mut groups: Vec<(&str, Vec<&FunctionDescriptor>)> = Vec::new();
    for descriptor in registry {
        let category = descriptor.category.as_deref().unwrap_or(UNCATEGORIZED);
        match groups.iter_mut().find(|(name, _)| *name == category) {
            Some((_, members)) => members.push(descriptor),
            None => groups.push((category, vec![descriptor])),
        }
    }

    let mut doc = format!("# Function Index\n\n{} functions.\n", registry.len());
    for (category, members) in groups {
        let _ = write!(doc, "\n## {}\n\n", category);
        for descriptor in members {
            let _ = write!(doc, "- [{0}]({0}.md)", descriptor.name);
            if let Some(summary) = &descriptor.summary {
                let _ = write!(doc, ": {}", summary);
            }
            doc.push('\n');
        }
    }
    doc
}

/// Write `index.md` plus one `<Name>.md` page per descriptor into `out_dir`.
///
/// Returns the number of function pages written.
pub fn write_help_site(registry: &FunctionRegistry, out_dir: &Path) -> io::Result<usize> {
    std::fs::create_dir_all(out_dir)?;
    std::fs::write(out_dir.join("index.md"), index_markdown(registry))?;

    let mut written = 0;
    for descriptor in registry {
        let path = out_dir.join(format!("{}.md", descriptor.name));
        std::fs::write(&path, descriptor_markdown(descriptor))?;
        written += 1;
    }

    tracing::info!("wrote {} help pages to {}", written, out_dir.display());
    Ok(written)
}

/// Keep table cells on one line and free of column separators.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

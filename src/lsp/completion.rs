//! Completion of catalogue function names.
//!
//! Suggests registry entries whose names start with the identifier typed
//! before the cursor. When the name is not already followed by a call
//! bracket, the completion inserts a snippet for the first overload.

use tower_lsp::lsp_types::*;

use crate::document::LineIndex;
use crate::types::{FunctionDescriptor, FunctionRegistry};

use super::hover::format_function_docs;

/// Snippet calling the first overload, with a tab stop per parameter.
fn call_snippet(descriptor: &FunctionDescriptor) -> String {
    let Some(sig) = descriptor.signatures.first() else {
        return descriptor.name.clone();
    };
    if sig.params.is_empty() {
        return format!("{}[$0]", descriptor.name);
    }
    let placeholders: Vec<String> = sig
        .params
        .iter()
        .enumerate()
        .map(|(i, p)| format!("${{{}:{}}}", i + 1, p.name))
        .collect();
    format!("{}[{}]", descriptor.name, placeholders.join(", "))
}

fn completion_item(descriptor: &FunctionDescriptor, with_snippet: bool) -> CompletionItem {
    let detail = descriptor
        .signatures
        .first()
        .map(|sig| sig.label(&descriptor.name));
    let (insert_text, insert_text_format) = if with_snippet {
        (call_snippet(descriptor), InsertTextFormat::SNIPPET)
    } else {
        (descriptor.name.clone(), InsertTextFormat::PLAIN_TEXT)
    };

    CompletionItem {
        label: descriptor.name.clone(),
        kind: Some(CompletionItemKind::FUNCTION),
        detail,
        label_details: descriptor.category.as_ref().map(|c| CompletionItemLabelDetails {
            detail: None,
            description: Some(c.clone()),
        }),
        documentation: Some(Documentation::MarkupContent(MarkupContent {
            kind: MarkupKind::Markdown,
            value: format_function_docs(descriptor),
        })),
        insert_text: Some(insert_text),
        insert_text_format: Some(insert_text_format),
        ..Default::default()
    }
}

/// Whether a call bracket follows `offset`, ignoring identifier characters
/// still under the cursor and whitespace.
fn followed_by_call(line_index: &LineIndex, offset: usize) -> bool {
    let end = line_index
        .identifier_at(offset)
        .map_or(offset, |span| span.end);
    matches!(
        line_index.source()[end..].trim_start().bytes().next(),
        Some(b'[') | Some(b'(')
    )
}

/// Generate completions at a position in the document.
pub fn completion_at_position(
    line_index: &LineIndex,
    registry: &FunctionRegistry,
    position: Position,
) -> Option<CompletionResponse> {
    let offset = line_index.position_to_offset(position)?;
    let prefix = line_index.prefix_before(offset);
    if prefix.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let with_snippet = !followed_by_call(line_index, offset);
    let items: Vec<CompletionItem> = registry
        .with_prefix(prefix)
        .map(|descriptor| completion_item(descriptor, with_snippet))
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(CompletionResponse::Array(items))
    }
}

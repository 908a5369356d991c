//! Hover information for catalogue function names.

use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Position};

use crate::document::DocumentState;
use crate::types::{FunctionDescriptor, FunctionRegistry};

/// Format descriptor documentation as compact markdown.
pub fn format_function_docs(descriptor: &FunctionDescriptor) -> String {
    let mut doc = format!("**{}**\n\n```\n", descriptor.name);
    for sig in &descriptor.signatures {
        doc.push_str(&sig.label(&descriptor.name));
        doc.push('\n');
    }
    doc.push_str("```");

    if let Some(summary) = &descriptor.summary {
        doc.push_str(&format!("\n\n{}", summary));
    }
    doc.push_str(&format!("\n\n[Documentation]({})", descriptor.help_url));
    doc
}

/// Get hover information for a position in the document.
///
/// Names inside strings and comments get no hover.
pub fn hover_at_position(
    state: &DocumentState,
    registry: &FunctionRegistry,
    position: Position,
) -> Option<Hover> {
    let line_index = &state.line_index;
    let offset = line_index.position_to_offset(position)?;
    let span = line_index.identifier_at(offset)?;
    if state.in_literal(span.start) {
        return None;
    }
    let descriptor = registry.get(&line_index.source()[span.clone()])?;

    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: format_function_docs(descriptor),
        }),
        range: Some(line_index.span_to_range(&span)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BUILTINS;

    fn hover_text(source: &str, position: Position) -> Option<String> {
        let state = DocumentState::new(source.to_string(), 0);
        let hover = hover_at_position(&state, &BUILTINS, position)?;
        match hover.contents {
            HoverContents::Markup(m) => Some(m.value),
            _ => panic!("Expected markup content"),
        }
    }

    #[test]
    fn hover_on_function_name() {
        let text = hover_text("ExperimentPCR[samples]", Position::new(0, 3)).unwrap();
        assert!(text.starts_with("**ExperimentPCR**"));
        assert!(text.contains("ExperimentPCR[Samples, Options] -> Protocol"));
        assert!(text.contains("ExperimentPCR[Samples, PrimerPairs, Options] -> Protocol"));
        assert!(text.contains("polymerase chain reaction"));
        assert!(text.contains("(https://www.emeraldcloudlab.com/helpfiles/experimentpcr)"));
    }

    #[test]
    fn hover_range_covers_name() {
        let state = DocumentState::new("x = PlotNMR[data]".to_string(), 0);
        let hover = hover_at_position(&state, &BUILTINS, Position::new(0, 6)).unwrap();
        let range = hover.range.unwrap();
        assert_eq!(range.start, Position::new(0, 4));
        assert_eq!(range.end, Position::new(0, 11));
    }

    #[test]
    fn no_hover_for_unknown_identifier() {
        assert!(hover_text("myVariable", Position::new(0, 2)).is_none());
    }

    #[test]
    fn no_hover_inside_strings_or_comments() {
        assert!(hover_text(r#"label = "PlotNMR""#, Position::new(0, 11)).is_none());
        assert!(hover_text("(* see PlotNMR *)", Position::new(0, 9)).is_none());
        assert!(hover_text(r#"PlotNMR["x"]"#, Position::new(0, 2)).is_some());
    }

    #[test]
    fn no_hover_on_punctuation() {
        assert!(hover_text("PlotNMR[ x ]", Position::new(0, 8)).is_none());
    }
}

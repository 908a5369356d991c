//! Diagnostics for calls that match no documented overload.

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString};

use crate::document::{CallSite, DocumentState};
use crate::types::{FunctionDescriptor, FunctionRegistry};

/// Describe a set of arities, e.g. "1 or 2 positional arguments".
fn describe_arities(arities: &[usize]) -> String {
    let counts: Vec<String> = arities.iter().map(|n| n.to_string()).collect();
    let joined = match counts.as_slice() {
        [] => "no".to_string(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    };
    let noun = if arities == [1] {
        "positional argument"
    } else {
        "positional arguments"
    };
    format!("{} {}", joined, noun)
}

/// Check one call against its descriptor, returning `(code, message)`.
fn check_call(
    call: &CallSite,
    descriptor: &FunctionDescriptor,
) -> Option<(&'static str, String)> {
    let positional = call.positional_count();
    let mut matching = descriptor.overloads_with_arity(positional).peekable();

    if matching.peek().is_none() {
        return Some((
            "arity-mismatch",
            format!(
                "{} expects {}, found {}",
                descriptor.name,
                describe_arities(&descriptor.arities()),
                positional
            ),
        ));
    }

    if call.has_options() && !matching.any(|sig| sig.accepts_options) {
        return Some((
            "options-not-accepted",
            format!(
                "{} does not accept options with {}",
                descriptor.name,
                describe_arities(&[positional])
            ),
        ));
    }

    None
}

/// Convert mismatched calls in a document to LSP diagnostics.
///
/// Calls that are still open are skipped; only calls to functions present in
/// the registry are checked.
pub fn to_diagnostics(state: &DocumentState, registry: &FunctionRegistry) -> Vec<Diagnostic> {
    state
        .calls
        .iter()
        .filter(|call| call.close.is_some())
        .filter_map(|call| {
            let descriptor = registry.get(&call.name)?;
            let (code, message) = check_call(call, descriptor)?;
            Some(Diagnostic {
                range: state.line_index.span_to_range(&call.name_span),
                severity: Some(DiagnosticSeverity::WARNING),
                code: Some(NumberOrString::String(code.to_string())),
                code_description: None,
                source: Some("labsp".to_string()),
                message,
                related_information: None,
                tags: None,
                data: None,
            })
        })
        .collect()
}

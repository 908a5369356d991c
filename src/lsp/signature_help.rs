//! Signature help inside calls to catalogue functions.
//!
//! Every overload of the enclosing function is offered. The active overload
//! is the first one with room for the positional arguments written so far;
//! the active parameter follows the cursor, and once an option rule has been
//! written the trailing `Options` slot stays selected.

use tower_lsp::lsp_types::*;

use crate::document::{CallSite, DocumentState};
use crate::types::{FunctionDescriptor, FunctionRegistry, Signature};

fn utf16_len(s: &str) -> u32 {
    s.encode_utf16().count() as u32
}

/// Build the LSP signature for one overload, labelling parameters by offset
/// so that names which also occur inside the function name highlight correctly.
fn signature_information(function: &str, sig: &Signature) -> SignatureInformation {
    let mut parameters = Vec::with_capacity(sig.params.len() + 1);
    let mut start = utf16_len(function) + 1;

    for param in &sig.params {
        let end = start + utf16_len(&param.name);
        parameters.push(ParameterInformation {
            label: ParameterLabel::LabelOffsets([start, end]),
            documentation: Some(Documentation::String(param.description.clone())),
        });
        start = end + 2;
    }
    if sig.accepts_options {
        parameters.push(ParameterInformation {
            label: ParameterLabel::LabelOffsets([start, start + utf16_len("Options")]),
            documentation: Some(Documentation::String(
                "Optional `OptionName -> value` rules.".to_string(),
            )),
        });
    }

    SignatureInformation {
        label: sig.label(function),
        documentation: Some(Documentation::MarkupContent(MarkupContent {
            kind: MarkupKind::Markdown,
            value: format!(
                "**Returns** `{}`: {}",
                sig.returns.name, sig.returns.description
            ),
        })),
        parameters: Some(parameters),
        active_parameter: None,
    }
}

/// Pick the active overload and parameter for a cursor at `offset`.
fn active_overload(
    descriptor: &FunctionDescriptor,
    call: &CallSite,
    offset: usize,
) -> (usize, usize) {
    let arg_index = call.argument_index_at(offset);
    // Positional arguments cannot follow an option rule.
    let in_options = call.args.iter().take(arg_index + 1).any(|a| a.is_option);
    let positional_before = call.args[..arg_index]
        .iter()
        .filter(|a| !a.is_option && !a.is_empty)
        .count();

    let needed = if in_options {
        call.positional_count()
    } else {
        call.positional_count().max(positional_before + 1)
    };

    let signature = descriptor
        .signatures
        .iter()
        .position(|sig| sig.arity() >= needed)
        .unwrap_or_else(|| {
            // Nothing fits; show the overload with the most parameters.
            descriptor
                .signatures
                .iter()
                .enumerate()
                .max_by_key(|(i, sig)| (sig.arity(), std::cmp::Reverse(*i)))
                .map_or(0, |(i, _)| i)
        });

    let arity = descriptor.signatures[signature].arity();
    let parameter = if in_options {
        arity
    } else {
        positional_before.min(arity)
    };
    (signature, parameter)
}

/// Get signature help for the call enclosing a position.
pub fn signature_help_at_position(
    state: &DocumentState,
    registry: &FunctionRegistry,
    position: Position,
) -> Option<SignatureHelp> {
    let offset = state.line_index.position_to_offset(position)?;
    let call = state.call_at(offset)?;
    let descriptor = registry.get(&call.name)?;
    if descriptor.signatures.is_empty() {
        return None;
    }

    let (signature, parameter) = active_overload(descriptor, call, offset);
    Some(SignatureHelp {
        signatures: descriptor
            .signatures
            .iter()
            .map(|sig| signature_information(&descriptor.name, sig))
            .collect(),
        active_signature: Some(signature as u32),
        active_parameter: Some(parameter as u32),
    })
}

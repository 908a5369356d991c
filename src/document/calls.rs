//! Call-site extraction from documents.
//!
//! Scans source text for `Head[arg, ...]` (or `Head(arg, ...)`) calls,
//! recording argument spans and whether each argument is an option rule
//! (`Name -> value` or `Name :> value`). Strings and `(* ... *)` comments
//! are skipped, and `expr[[i]]` part access is not treated as a call.
//! Calls left open at end of input are kept with no closing offset so that
//! signature help works while the user is typing.

use std::ops::Range;

use super::text::is_ident_byte;

/// One argument of a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    /// Byte span of the argument text, between separators.
    pub span: Range<usize>,
    /// Whether the argument is an option rule.
    pub is_option: bool,
    /// Whether the argument contains only whitespace.
    pub is_empty: bool,
}

/// A call found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Name of the called function.
    pub name: String,
    /// Byte span of the function name.
    pub name_span: Range<usize>,
    /// Offset of the opening bracket.
    pub open: usize,
    /// Offset of the closing bracket, if the call is closed.
    pub close: Option<usize>,
    /// Arguments in order. An empty call has a single empty argument.
    pub args: Vec<Argument>,
}

impl CallSite {
    /// Positional (non-option, non-empty) arguments.
    pub fn positional(&self) -> impl Iterator<Item = &Argument> {
        self.args.iter().filter(|a| !a.is_option && !a.is_empty)
    }

    pub fn positional_count(&self) -> usize {
        self.positional().count()
    }

    pub fn has_options(&self) -> bool {
        self.args.iter().any(|a| a.is_option)
    }

    /// Whether `offset` lies between the brackets.
    pub fn contains_offset(&self, offset: usize) -> bool {
        offset > self.open && self.close.map_or(true, |close| offset <= close)
    }

    /// Index of the argument the cursor at `offset` is in.
    pub fn argument_index_at(&self, offset: usize) -> usize {
        self.args
            .iter()
            .position(|a| offset <= a.span.end)
            .unwrap_or(self.args.len().saturating_sub(1))
    }
}

/// An open bracket awaiting its match.
#[derive(Debug)]
enum Frame {
    Call {
        site: CallSite,
        arg_start: usize,
        arg_is_option: bool,
    },
    Group,
}

/// Extract every call site, ordered by the position of the opening bracket.
pub fn extract_calls(source: &str) -> Vec<CallSite> {
    let bytes = source.as_bytes();
    let mut stack: Vec<Frame> = Vec::new();
    let mut calls = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'"' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'(' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_comment(bytes, i);
                continue;
            }
            b'[' | b'(' => {
                let head = head_before(bytes, i);
                let is_part = b == b'[' && bytes.get(i + 1) == Some(&b'[');
                match head {
                    Some(name_span) if !is_part => stack.push(Frame::Call {
                        site: CallSite {
                            name: source[name_span.clone()].to_string(),
                            name_span,
                            open: i,
                            close: None,
                            args: Vec::new(),
                        },
                        arg_start: i + 1,
                        arg_is_option: false,
                    }),
                    _ => stack.push(Frame::Group),
                }
                if is_part {
                    stack.push(Frame::Group);
                    i += 1;
                }
            }
            b'{' => stack.push(Frame::Group),
            b']' | b')' | b'}' => {
                if let Some(frame) = stack.pop() {
                    if let Frame::Call {
                        mut site,
                        arg_start,
                        arg_is_option,
                    } = frame
                    {
                        push_argument(&mut site, source, arg_start..i, arg_is_option);
                        site.close = Some(i);
                        calls.push(site);
                    }
                }
            }
            b',' => {
                if let Some(Frame::Call {
                    site,
                    arg_start,
                    arg_is_option,
                }) = stack.last_mut()
                {
                    push_argument(site, source, *arg_start..i, *arg_is_option);
                    *arg_start = i + 1;
                    *arg_is_option = false;
                }
            }
            b'-' | b':' if bytes.get(i + 1) == Some(&b'>') => {
                if let Some(Frame::Call { arg_is_option, .. }) = stack.last_mut() {
                    *arg_is_option = true;
                }
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }

    // Unclosed calls run to the end of the input.
    while let Some(frame) = stack.pop() {
        if let Frame::Call {
            mut site,
            arg_start,
            arg_is_option,
        } = frame
        {
            push_argument(&mut site, source, arg_start..bytes.len(), arg_is_option);
            calls.push(site);
        }
    }

    calls.sort_by_key(|c| c.open);
    calls
}

/// Byte spans of string literals and comments, in source order.
pub fn literal_spans(source: &str) -> Vec<Range<usize>> {
    let bytes = source.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let end = match bytes[i] {
            b'"' => skip_string(bytes, i),
            b'(' if bytes.get(i + 1) == Some(&b'*') => skip_comment(bytes, i),
            _ => {
                i += 1;
                continue;
            }
        };
        spans.push(i..end);
        i = end;
    }
    spans
}

/// The innermost call whose brackets contain `offset`.
pub fn call_at_offset(calls: &[CallSite], offset: usize) -> Option<&CallSite> {
    calls
        .iter()
        .filter(|c| c.contains_offset(offset))
        .max_by_key(|c| c.open)
}

fn push_argument(site: &mut CallSite, source: &str, span: Range<usize>, is_option: bool) {
    let is_empty = source[span.clone()].trim().is_empty();
    site.args.push(Argument {
        span,
        is_option,
        is_empty,
    });
}

/// Span of the identifier directly before the bracket at `open`, allowing
/// whitespace in between.
fn head_before(bytes: &[u8], open: usize) -> Option<Range<usize>> {
    let end = open
        - bytes[..open]
            .iter()
            .rev()
            .take_while(|b| b.is_ascii_whitespace())
            .count();
    let start = end
        - bytes[..end]
            .iter()
            .rev()
            .take_while(|&&b| is_ident_byte(b))
            .count();
    if start == end || bytes[start].is_ascii_digit() {
        return None;
    }
    Some(start..end)
}

/// Offset just past the string starting at `start`.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Offset just past the (possibly nested) comment starting at `start`.
fn skip_comment(bytes: &[u8], start: usize) -> usize {
    let mut depth = 0;
    let mut i = start;
    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'(', b'*') => {
                depth += 1;
                i += 2;
            }
            (b'*', b')') => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    return i;
                }
            }
            _ => i += 1,
        }
    }
    bytes.len()
}

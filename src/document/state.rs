//! Document state management for the language server.

use std::ops::Range;
use std::sync::Arc;

use dashmap::DashMap;
use tower_lsp::lsp_types::Url;

use super::calls::{call_at_offset, extract_calls, literal_spans, CallSite};
use super::text::LineIndex;

/// State for a single open document.
#[derive(Debug, Clone)]
pub struct DocumentState {
    /// Pre-computed line index for position conversion.
    pub line_index: LineIndex,
    /// Calls found in the document, ordered by opening bracket.
    pub calls: Vec<CallSite>,
    /// Spans of string literals and comments.
    pub literals: Vec<Range<usize>>,
    /// Document version from the client.
    pub version: i32,
}

impl DocumentState {
    /// Create a new document state by scanning the source for calls.
    pub fn new(source: String, version: i32) -> Self {
        let calls = extract_calls(&source);
        let literals = literal_spans(&source);
        Self {
            line_index: LineIndex::new(source),
            calls,
            literals,
            version,
        }
    }

    pub fn source(&self) -> &str {
        self.line_index.source()
    }

    /// Whether `offset` falls inside a string literal or comment.
    pub fn in_literal(&self, offset: usize) -> bool {
        self.literals.iter().any(|span| span.contains(&offset))
    }

    /// The innermost call enclosing `offset`.
    pub fn call_at(&self, offset: usize) -> Option<&CallSite> {
        call_at_offset(&self.calls, offset)
    }
}

/// Thread-safe storage for open documents.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<Url, Arc<DocumentState>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Open or update a document with the given source text.
    pub fn open(&self, uri: Url, source: String, version: i32) -> Arc<DocumentState> {
        let state = Arc::new(DocumentState::new(source, version));
        self.documents.insert(uri, Arc::clone(&state));
        state
    }

    pub fn close(&self, uri: &Url) {
        self.documents.remove(uri);
    }

    pub fn get(&self, uri: &Url) -> Option<Arc<DocumentState>> {
        self.documents.get(uri).map(|r| Arc::clone(&r))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

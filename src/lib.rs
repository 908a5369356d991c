//! Documentation registry and language server for remote lab-automation functions.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService};

pub mod catalog;
mod document;
mod lsp;
pub mod render;
pub mod settings;
pub mod types;

pub use document::{extract_calls, Argument, CallSite, DocumentState, DocumentStore, LineIndex};
pub use lsp::{
    completion_at_position, format_function_docs, hover_at_position, signature_help_at_position,
    to_diagnostics,
};
pub use settings::{build_registry, discover_registry, discover_settings, load_settings};
pub use types::{FunctionDescriptor, FunctionRegistry, Param, RegistryError, ReturnDesc, Signature};

pub struct Backend {
    client: Client,
    documents: DocumentStore,
    workspace_root: OnceLock<PathBuf>,
    registry: OnceLock<Arc<FunctionRegistry>>,
}

impl Backend {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            documents: DocumentStore::new(),
            workspace_root: OnceLock::new(),
            registry: OnceLock::new(),
        }
    }

    /// Create a backend with a fixed registry; settings discovery is skipped.
    pub(crate) fn with_registry(client: Client, registry: Arc<FunctionRegistry>) -> Self {
        let backend = Self::new(client);
        let _ = backend.registry.set(registry);
        backend
    }

    /// Scan the document and publish diagnostics.
    async fn on_document_change(&self, uri: Url, text: String, version: i32) {
        let state = self.documents.open(uri.clone(), text, version);
        let diagnostics = match self.registry.get() {
            Some(registry) => lsp::to_diagnostics(&state, registry),
            None => Vec::new(),
        };
        self.client
            .publish_diagnostics(uri, diagnostics, Some(state.version))
            .await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let workspace_root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .and_then(|f| f.uri.to_file_path().ok())
            .or_else(|| {
                #[allow(deprecated)]
                params.root_uri.as_ref()?.to_file_path().ok()
            });

        if let Some(root) = &workspace_root {
            let _ = self.workspace_root.set(root.clone());
        }

        if self.registry.get().is_some() {
            tracing::debug!("registry already configured; skipping settings discovery");
        } else {
            let registry = match &workspace_root {
                Some(root) => settings::discover_registry(root),
                None => {
                    settings::build_registry(&settings::Settings::default(), &PathBuf::from("."))
                }
            };
            let _ = self.registry.set(Arc::new(registry));
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    ..Default::default()
                }),
                signature_help_provider: Some(SignatureHelpOptions {
                    trigger_characters: Some(vec!["[".to_string(), "(".to_string()]),
                    retrigger_characters: Some(vec![",".to_string()]),
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let count = self.registry.get().map_or(0, |r| r.len());
        tracing::info!(
            functions = count,
            root = ?self.workspace_root.get(),
            "language server initialized"
        );
        self.client
            .log_message(
                MessageType::INFO,
                format!("labsp initialized with {} functions", count),
            )
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.on_document_change(
            params.text_document.uri,
            params.text_document.text,
            params.text_document.version,
        )
        .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // FULL sync: exactly one change carrying the whole text
        if let Some(change) = params.content_changes.into_iter().next() {
            self.on_document_change(
                params.text_document.uri,
                change.text,
                params.text_document.version,
            )
            .await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.documents.close(&params.text_document.uri);
        self.client
            .publish_diagnostics(params.text_document.uri, vec![], None)
            .await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let (Some(doc), Some(registry)) = (self.documents.get(uri), self.registry.get()) else {
            return Ok(None);
        };
        Ok(lsp::hover_at_position(&doc, registry, position))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let (Some(doc), Some(registry)) = (self.documents.get(uri), self.registry.get()) else {
            tracing::debug!("completion requested for unknown document {}", uri);
            return Ok(None);
        };
        Ok(lsp::completion_at_position(
            &doc.line_index,
            registry,
            position,
        ))
    }

    async fn signature_help(&self, params: SignatureHelpParams) -> Result<Option<SignatureHelp>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let (Some(doc), Some(registry)) = (self.documents.get(uri), self.registry.get()) else {
            return Ok(None);
        };
        Ok(lsp::signature_help_at_position(&doc, registry, position))
    }
}

pub fn create_service() -> (LspService<Backend>, tower_lsp::ClientSocket) {
    LspService::new(Backend::new)
}

/// Create a service that answers from `registry` instead of discovered settings.
pub fn create_service_with_registry(
    registry: Arc<FunctionRegistry>,
) -> (LspService<Backend>, tower_lsp::ClientSocket) {
    LspService::new(move |client| Backend::with_registry(client, registry))
}

//! Language server for Event-B machine and context files.
//!
//! This is glue between the editor and the compiler core: it keeps the open
//! documents in memory (full sync), revalidates a document wholesale on
//! every open/change/save, pushes the resulting diagnostics, and compiles
//! to the Rodin project directory on save. Compilation is fire-and-forget:
//! failures are logged through the client, never returned to the editor.

use std::path::{Path, PathBuf};

use dashmap::DashMap;
use parking_lot::RwLock;
use serde::Deserialize;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

use eventb_compile::{compile_source, write_artifact, OUTPUT_DIR};
use eventb_syntax::{SourceKind, KEYWORDS};

/// Advisory per-document settings. Cached between validations and
/// invalidated when the document closes or the configuration changes;
/// correctness never depends on the cache.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentSettings {
    /// Maximum number of diagnostics published per document.
    pub max_number_of_problems: usize,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            max_number_of_problems: 1000,
        }
    }
}

/// The language server state.
pub struct EventBServer {
    client: Client,
    /// Current text of every open document, full-sync.
    documents: DashMap<Url, String>,
    /// Settings cache, keyed by document identity.
    document_settings: DashMap<Url, DocumentSettings>,
    /// Fallback settings when no per-document value is cached.
    global_settings: RwLock<DocumentSettings>,
    workspace_root: RwLock<Option<PathBuf>>,
}

impl EventBServer {
    /// Create a server bound to an LSP client handle.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: DashMap::new(),
            document_settings: DashMap::new(),
            global_settings: RwLock::new(DocumentSettings::default()),
            workspace_root: RwLock::new(None),
        }
    }

    fn settings_for(&self, uri: &Url) -> DocumentSettings {
        self.document_settings
            .entry(uri.clone())
            .or_insert_with(|| self.global_settings.read().clone())
            .clone()
    }

    async fn validate(&self, uri: Url, text: &str) {
        let Some(kind) = source_kind(&uri) else {
            return;
        };
        let settings = self.settings_for(&uri);
        let diagnostics: Vec<Diagnostic> = eventb_analysis::check(text, kind)
            .iter()
            .take(settings.max_number_of_problems)
            .map(|diagnostic| to_lsp_diagnostic(diagnostic, text))
            .collect();
        self.client.publish_diagnostics(uri, diagnostics, None).await;
    }

    async fn compile(&self, uri: &Url) {
        let Some(kind) = source_kind(uri) else {
            return;
        };
        let Some(text) = self.documents.get(uri).map(|entry| entry.value().clone()) else {
            return;
        };
        let root = self.workspace_root.read().clone();
        let Some(root) = root else {
            self.client
                .log_message(
                    MessageType::WARNING,
                    "no workspace root, skipping compilation",
                )
                .await;
            return;
        };

        let directory = root.join(OUTPUT_DIR);
        let written = compile_source(&text, kind)
            .and_then(|artifact| write_artifact(&directory, &artifact));
        match written {
            Ok(path) => {
                self.client
                    .log_message(MessageType::INFO, format!("compiled {}", path.display()))
                    .await;
            }
            Err(error) => {
                tracing::warn!(%error, "compilation failed");
                self.client
                    .log_message(MessageType::ERROR, format!("compilation failed: {error}"))
                    .await;
            }
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for EventBServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        #[allow(deprecated)]
        let root = params.root_uri.and_then(|uri| uri.to_file_path().ok());
        *self.workspace_root.write() = root;

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "eventb-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    ..CompletionOptions::default()
                }),
                ..ServerCapabilities::default()
            },
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Event-B language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let text = params.text_document.text;
        self.documents.insert(uri.clone(), text.clone());
        self.validate(uri, &text).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // Full sync: the last change carries the whole document.
        let Some(change) = params.content_changes.into_iter().next_back() else {
            return;
        };
        let uri = params.text_document.uri;
        self.documents.insert(uri.clone(), change.text.clone());
        self.validate(uri, &change.text).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Some(text) = self.documents.get(&uri).map(|entry| entry.value().clone()) {
            self.validate(uri.clone(), &text).await;
        }
        self.compile(&uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.remove(&uri);
        self.document_settings.remove(&uri);
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let settings = params
            .settings
            .get("eventb")
            .cloned()
            .and_then(|value| serde_json::from_value::<DocumentSettings>(value).ok())
            .unwrap_or_default();
        *self.global_settings.write() = settings;
        self.document_settings.clear();

        // Revalidate everything that is open.
        let open: Vec<(Url, String)> = self
            .documents
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        for (uri, text) in open {
            self.validate(uri, &text).await;
        }
    }

    async fn completion(&self, _: CompletionParams) -> Result<Option<CompletionResponse>> {
        Ok(Some(CompletionResponse::Array(completions())))
    }
}

/// Start the server on stdio.
pub async fn run_server() {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(EventBServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}

fn source_kind(uri: &Url) -> Option<SourceKind> {
    SourceKind::from_path(Path::new(uri.path()))
}

fn to_lsp_diagnostic(diagnostic: &eventb_analysis::Diagnostic, text: &str) -> Diagnostic {
    let message = match &diagnostic.hint {
        Some(hint) => format!("{} ({hint})", diagnostic.message),
        None => diagnostic.message.clone(),
    };
    Diagnostic {
        range: Range {
            start: offset_to_position(text, diagnostic.range.start as usize),
            end: offset_to_position(text, diagnostic.range.end as usize),
        },
        severity: Some(match diagnostic.severity {
            eventb_analysis::Severity::Error => DiagnosticSeverity::ERROR,
            eventb_analysis::Severity::Warning => DiagnosticSeverity::WARNING,
        }),
        source: Some("eventb".to_string()),
        message,
        ..Diagnostic::default()
    }
}

/// Convert a byte offset into an LSP position (UTF-16 column).
fn offset_to_position(text: &str, offset: usize) -> Position {
    let offset = offset.min(text.len());
    let before = &text[..offset];
    let line = before.matches('\n').count() as u32;
    let line_start = before.rfind('\n').map_or(0, |index| index + 1);
    let character = text[line_start..offset]
        .chars()
        .map(|c| c.len_utf16() as u32)
        .sum();
    Position { line, character }
}

/// The static completion list: every grammar keyword plus the builtin
/// literals.
fn completions() -> Vec<CompletionItem> {
    let mut items: Vec<CompletionItem> = KEYWORDS
        .iter()
        .map(|&keyword| CompletionItem {
            label: keyword.to_string(),
            kind: Some(if keyword == "machine" || keyword == "context" {
                CompletionItemKind::CLASS
            } else {
                CompletionItemKind::KEYWORD
            }),
            ..CompletionItem::default()
        })
        .collect();
    for literal in ["TRUE", "FALSE", "BOOL"] {
        items.push(CompletionItem {
            label: literal.to_string(),
            kind: Some(CompletionItemKind::VALUE),
            ..CompletionItem::default()
        });
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_count_lines_and_utf16_columns() {
        let text = "machine m\nvariables x≔y\nend\n";
        assert_eq!(offset_to_position(text, 0), Position::new(0, 0));
        assert_eq!(offset_to_position(text, 10), Position::new(1, 0));
        // `≔` is three bytes but one UTF-16 unit.
        let after_symbol = text.find('y').unwrap();
        assert_eq!(offset_to_position(text, after_symbol), Position::new(1, 12));
        assert_eq!(offset_to_position(text, text.len()), Position::new(3, 0));
    }

    #[test]
    fn position_clamps_past_the_end() {
        assert_eq!(offset_to_position("ab", 99), Position::new(0, 2));
    }

    #[test]
    fn completions_cover_keywords_and_literals() {
        let items = completions();
        let labels: Vec<_> = items.iter().map(|item| item.label.as_str()).collect();
        for keyword in ["machine", "context", "events", "theorem", "end"] {
            assert!(labels.contains(&keyword));
        }
        for literal in ["TRUE", "FALSE", "BOOL"] {
            assert!(labels.contains(&literal));
        }
    }

    #[test]
    fn hints_fold_into_the_published_message() {
        let diagnostic = eventb_analysis::Diagnostic {
            range: eventb_syntax::Span::new(0, 4),
            severity: eventb_analysis::Severity::Error,
            message: "expected 'end' but found end of input".to_string(),
            hint: Some("a closing 'end' may be missing".to_string()),
        };
        let lsp = to_lsp_diagnostic(&diagnostic, "text");
        assert!(lsp.message.ends_with("(a closing 'end' may be missing)"));
        assert_eq!(lsp.severity, Some(DiagnosticSeverity::ERROR));
    }

    #[test]
    fn only_eventb_extensions_have_a_kind() {
        let machine = Url::parse("file:///tmp/lift.bm").unwrap();
        let context = Url::parse("file:///tmp/lift.bc").unwrap();
        let other = Url::parse("file:///tmp/lift.rs").unwrap();
        assert_eq!(source_kind(&machine), Some(SourceKind::Machine));
        assert_eq!(source_kind(&context), Some(SourceKind::Context));
        assert_eq!(source_kind(&other), None);
    }
}

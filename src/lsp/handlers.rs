use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;

use crate::catalog::Catalog;
use crate::lsp::backend::Backend;
use crate::lsp::document::{self, DocumentState};
use crate::parser::{self, Device, Field, lexer};
use crate::report::validate_document_with;
use crate::validation::Severity;

/// Trait for handling hover requests
#[tower_lsp::async_trait]
pub trait HandleHover {
    async fn handle_hover(&self, params: HoverParams) -> LspResult<Option<Hover>>;
}

/// Trait for handling completion requests
#[tower_lsp::async_trait]
pub trait HandleCompletion {
    async fn handle_completion(
        &self,
        params: CompletionParams,
    ) -> LspResult<Option<CompletionResponse>>;
}

/// Trait for handling document symbols
#[tower_lsp::async_trait]
pub trait HandleDocumentSymbol {
    async fn handle_document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> LspResult<Option<DocumentSymbolResponse>>;
}

/// Trait for handling diagnostics
#[tower_lsp::async_trait]
pub trait HandleDiagnostics {
    async fn publish_diagnostics(&self, uri: Url);
}

#[tower_lsp::async_trait]
impl HandleHover for Backend {
    async fn handle_hover(&self, params: HoverParams) -> LspResult<Option<Hover>> {
        let tdpp = params.text_document_position_params;
        let uri = tdpp.text_document.uri;
        let pos = tdpp.position;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        let line = doc_state.line(pos.line as usize);
        let byte = document::byte_offset(line, pos.character);
        let catalog = self.catalog.read().await;

        Ok(hover_text(line, byte, &catalog).map(|value| Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value,
            }),
            range: None,
        }))
    }
}

/// Markdown describing the field under `byte`, if there is anything to say
fn hover_text(line: &str, byte: usize, catalog: &Catalog) -> Option<String> {
    let tokens = lexer::tokenize_line(line);
    let (idx, token) = tokens
        .iter()
        .enumerate()
        .find(|(_, t)| byte >= t.start && byte < t.end)?;

    match Field::from_index(idx)? {
        Field::Device => {
            let device = Device::classify(token.text);
            let description = match &device {
                Device::Path(_) => "Device path. Kernel names can change between boots.",
                Device::Uuid(_) => "Filesystem UUID. Stable across reboots and re-cabling.",
                Device::Label(_) => "Filesystem label. Stable as long as labels are unique.",
                Device::Swap => "Swap device placeholder.",
                Device::Unknown(_) => "Unrecognized device. Prefer UUID=... or LABEL=...",
            };
            Some(format!(
                "**{}** ({} device)\n\n{}",
                token.text,
                device.kind_name(),
                description
            ))
        }
        Field::MountPoint => None,
        Field::Filesystem => {
            let term = catalog.filesystem(token.text)?;
            Some(format!("**{}** (filesystem)\n\n{}", term.name, term.describe()))
        }
        Field::Options => {
            let offset = byte - token.start;
            let option = option_at(token.text, offset)?;
            let name = option.split('=').next().unwrap_or(option);
            let term = catalog.option(name)?;
            Some(format!("**{}** (mount option)\n\n{}", term.name, term.describe()))
        }
        Field::Dump => Some("**dump**\n\n`1` to include in dump(8) backups, `0` to skip.".to_string()),
        Field::Pass => Some(
            "**pass**\n\nfsck order: `1` for the root filesystem, `2` for others, `0` to skip."
                .to_string(),
        ),
    }
}

/// The comma-separated item of an options column containing `offset`
fn option_at(options: &str, offset: usize) -> Option<&str> {
    let mut start = 0;
    for item in options.split(',') {
        let end = start + item.len();
        if offset >= start && offset <= end {
            return if item.is_empty() { None } else { Some(item) };
        }
        start = end + 1;
    }
    None
}

#[tower_lsp::async_trait]
impl HandleCompletion for Backend {
    async fn handle_completion(
        &self,
        params: CompletionParams,
    ) -> LspResult<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let pos = params.text_document_position.position;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        let line = doc_state.line(pos.line as usize);
        let byte = document::byte_offset(line, pos.character);
        let catalog = self.catalog.read().await;

        let completions = completions_at(line, byte, &catalog);
        if completions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(CompletionResponse::Array(completions)))
        }
    }
}

fn completions_at(line: &str, byte: usize, catalog: &Catalog) -> Vec<CompletionItem> {
    let Some(column) = document::column_at(line, byte) else {
        return Vec::new();
    };
    let prefix = &line[..byte.min(line.len())];
    let current_word = if prefix.ends_with(char::is_whitespace) {
        ""
    } else {
        prefix.split_whitespace().last().unwrap_or("")
    };

    match Field::from_index(column) {
        Some(Field::Device) => ["UUID=", "LABEL="]
            .into_iter()
            .filter(|tag| tag.starts_with(current_word))
            .map(|tag| CompletionItem {
                label: tag.to_string(),
                kind: Some(CompletionItemKind::KEYWORD),
                detail: Some("Stable device identifier".to_string()),
                ..Default::default()
            })
            .collect(),
        Some(Field::Filesystem) => catalog
            .filesystem_names()
            .into_iter()
            .filter(|name| name.starts_with(current_word))
            .filter_map(|name| catalog.filesystem(name))
            .map(|term| CompletionItem {
                label: term.name.clone(),
                kind: Some(CompletionItemKind::ENUM_MEMBER),
                detail: Some("filesystem".to_string()),
                documentation: term.description.clone().map(Documentation::String),
                ..Default::default()
            })
            .collect(),
        Some(Field::Options) => {
            let (present, partial) = match current_word.rsplit_once(',') {
                Some((before, partial)) => (parser::split_options(before), partial),
                None => (Vec::new(), current_word),
            };
            catalog
                .option_names()
                .into_iter()
                .filter(|name| name.starts_with(partial))
                .filter(|name| !present.iter().any(|p| p == name))
                .filter_map(|name| catalog.option(name))
                .map(|term| CompletionItem {
                    label: term.name.clone(),
                    kind: Some(CompletionItemKind::PROPERTY),
                    detail: Some("mount option".to_string()),
                    documentation: term.description.clone().map(Documentation::String),
                    ..Default::default()
                })
                .collect()
        }
        Some(Field::Dump) => numeric_items(Field::Dump, &["0", "1"]),
        Some(Field::Pass) => numeric_items(Field::Pass, &["0", "1", "2"]),
        Some(Field::MountPoint) | None => Vec::new(),
    }
}

fn numeric_items(field: Field, values: &[&str]) -> Vec<CompletionItem> {
    values
        .iter()
        .map(|v| CompletionItem {
            label: v.to_string(),
            kind: Some(CompletionItemKind::VALUE),
            detail: Some(field.name().to_string()),
            ..Default::default()
        })
        .collect()
}

#[tower_lsp::async_trait]
impl HandleDiagnostics for Backend {
    async fn publish_diagnostics(&self, uri: Url) {
        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return,
        };

        let catalog = self.catalog.read().await;
        let report = validate_document_with(&doc_state.content, &catalog);
        drop(catalog);

        let diagnostics = report
            .diagnostics()
            .map(|d| create_lsp_diagnostic(doc_state, d))
            .collect();
        drop(docs);

        self.client
            .publish_diagnostics(uri, diagnostics, None)
            .await;
    }
}

fn create_lsp_diagnostic(
    doc_state: &DocumentState,
    diagnostic: &crate::validation::Diagnostic,
) -> tower_lsp::lsp_types::Diagnostic {
    let severity = match diagnostic.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Suggestion => DiagnosticSeverity::HINT,
    };

    let line_idx = diagnostic.line.saturating_sub(1);
    let range = document::field_range(doc_state.line(line_idx), line_idx as u32, diagnostic.field);

    tower_lsp::lsp_types::Diagnostic::new(
        range,
        Some(severity),
        Some(NumberOrString::String(diagnostic.rule.to_string())),
        Some("fstab-ls".to_string()),
        diagnostic.message.clone(),
        None,
        None,
    )
}

#[tower_lsp::async_trait]
impl HandleDocumentSymbol for Backend {
    async fn handle_document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> LspResult<Option<DocumentSymbolResponse>> {
        let uri = params.text_document.uri;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        Ok(Some(DocumentSymbolResponse::Nested(entry_symbols(
            &doc_state.content,
        ))))
    }
}

/// One symbol per well-formed entry, named after its mount point
fn entry_symbols(content: &str) -> Vec<DocumentSymbol> {
    parser::parse_document(content)
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| {
            let line_idx = (entry.line_number - 1) as u32;
            let mount = entry.span(Field::MountPoint);
            let line = entry.raw_line.as_str();

            let kind = if entry.filesystem == "swap" {
                SymbolKind::EVENT
            } else {
                SymbolKind::MODULE
            };

            DocumentSymbol {
                name: format!("{} ({})", entry.mount_point, entry.filesystem),
                detail: Some(entry.device.to_string()),
                kind,
                tags: None,
                #[allow(deprecated)]
                deprecated: Some(false), // Required by tower-lsp 0.20, use tags instead in future versions
                range: Range::new(
                    Position::new(line_idx, 0),
                    Position::new(line_idx, document::utf16_column(line, line.len())),
                ),
                selection_range: Range::new(
                    Position::new(line_idx, document::utf16_column(line, mount.start)),
                    Position::new(line_idx, document::utf16_column(line, mount.end)),
                ),
                children: None,
            }
        })
        .collect()
}

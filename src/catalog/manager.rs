//! Catalog manager for the language server.
//!
//! Holds the effective catalog behind a lock, watches the catalog
//! directories and rebuilds the layered catalog whenever a `*.toml` file
//! in them is created, modified or removed.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{RwLock, mpsc};
use tower_lsp::Client;
use tower_lsp::lsp_types::MessageType;

use super::loader::{CatalogSources, LayerIssue, load_catalog};
use super::schema::Catalog;

/// Events from the file watcher
#[derive(Debug)]
enum WatcherEvent {
    CatalogFileChanged(PathBuf),
    WatcherError(notify::Error),
}

/// Loads, watches and serves the layered catalog
pub struct CatalogManager {
    catalog: Arc<RwLock<Catalog>>,
    sources: CatalogSources,
    _watcher: Option<RecommendedWatcher>,
    client: Option<Client>,
}

impl CatalogManager {
    pub fn new(sources: CatalogSources) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(Catalog::builtin())),
            sources,
            _watcher: None,
            client: None,
        }
    }

    /// Load all layers and start watching the catalog directories
    pub async fn initialize(&mut self, client: Option<Client>) -> Result<()> {
        self.client = client;

        Self::reload(&self.catalog, &self.sources, self.client.as_ref()).await;
        self.start_watching()?;

        Ok(())
    }

    /// Snapshot of the current catalog
    pub async fn current(&self) -> Catalog {
        self.catalog.read().await.clone()
    }

    /// Shared handle to the catalog, for readers that outlive `&self`
    pub fn handle(&self) -> Arc<RwLock<Catalog>> {
        self.catalog.clone()
    }

    fn start_watching(&mut self) -> Result<()> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if let EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) =
                        event.kind
                    {
                        for path in event.paths {
                            if path.extension().and_then(|s| s.to_str()) == Some("toml") {
                                let _ = tx.send(WatcherEvent::CatalogFileChanged(path));
                            }
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatcherEvent::WatcherError(e));
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(1)),
        )?;

        for dir in &self.sources.dirs {
            if dir.exists() {
                watcher.watch(dir, RecursiveMode::NonRecursive)?;
            }
        }

        self._watcher = Some(watcher);
        self.spawn_watcher_task(rx);

        Ok(())
    }

    fn spawn_watcher_task(&self, mut rx: mpsc::UnboundedReceiver<WatcherEvent>) {
        let catalog = self.catalog.clone();
        let sources = self.sources.clone();
        let client = self.client.clone();

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match event {
                    WatcherEvent::CatalogFileChanged(path) => {
                        log_to_client(
                            client.as_ref(),
                            MessageType::INFO,
                            format!("Catalog file changed: {}", path.display()),
                        )
                        .await;

                        // Rebuild from every layer: removals must drop terms too.
                        // Open documents pick the new catalog up on their next change.
                        Self::reload(&catalog, &sources, client.as_ref()).await;
                    }
                    WatcherEvent::WatcherError(e) => {
                        log_to_client(
                            client.as_ref(),
                            MessageType::ERROR,
                            format!("Catalog file watcher error: {}", e),
                        )
                        .await;
                    }
                }
            }
        });
    }

    async fn reload(
        catalog: &Arc<RwLock<Catalog>>,
        sources: &CatalogSources,
        client: Option<&Client>,
    ) {
        let (fresh, issues) = load_catalog(sources);

        for LayerIssue { path, error } in &issues {
            log_to_client(
                client,
                MessageType::ERROR,
                format!("Failed to load catalog {}: {:#}", path.display(), error),
            )
            .await;
        }

        let summary = format!(
            "Loaded fstab catalog ({} filesystems, {} options) from layers: {}",
            fresh.filesystems.len(),
            fresh.options.len(),
            fresh.layers.join(", ")
        );

        *catalog.write().await = fresh;

        log_to_client(client, MessageType::INFO, summary).await;
    }
}

async fn log_to_client(client: Option<&Client>, typ: MessageType, message: String) {
    if typ == MessageType::ERROR {
        log::error!("{}", message);
    } else {
        log::info!("{}", message);
    }

    if let Some(client) = client {
        client.log_message(typ, message).await;
    }
}

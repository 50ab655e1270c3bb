use anyhow::Result;
use clap::Parser;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

use crate::catalog::CatalogManager;
use crate::config::{Config, ServerArgs};
use crate::lsp::backend::Backend;

/// Start the LSP server on stdio
pub async fn serve() -> Result<()> {
    let config = Config::from_common(ServerArgs::parse().common)?;
    config.init_logging();

    log::info!(
        "Starting fstab-ls with catalog directories {:?}",
        config.catalog_dirs
    );

    let catalog_manager = CatalogManager::new(config.catalog_sources());

    let (service, socket) =
        LspService::build(move |client| Backend::new(client, catalog_manager)).finish();

    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}

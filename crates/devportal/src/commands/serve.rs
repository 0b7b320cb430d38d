//! API server command.

use anyhow::Result;
use devportal_server::DevPortalServer;

use crate::config::ConfigFile;

/// Run the serve command.
pub async fn run(
    config: &ConfigFile,
    port: Option<u16>,
    host: Option<String>,
    watch: bool,
) -> Result<()> {
    let mut server_config = config.server_config();
    if let Some(port) = port {
        server_config.port = port;
    }
    if let Some(host) = host {
        server_config.host = host;
    }
    server_config.watch = watch;

    tracing::info!(
        "Starting DevPortal API on {}:{}",
        server_config.host,
        server_config.port
    );

    DevPortalServer::new(server_config).start().await?;

    Ok(())
}

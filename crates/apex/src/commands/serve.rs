//! Preview server command.

use std::path::PathBuf;

use anyhow::Result;

/// Run the serve command.
pub async fn run(port: u16, dir: PathBuf) -> Result<()> {
    apex_server::preview(&dir, "127.0.0.1", port, true).await?;
    Ok(())
}

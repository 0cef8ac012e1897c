//! Client data file loading.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::client::ClientRecord;

/// Errors that can occur when loading client data.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read client data {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Invalid client data in {path}: {message}")]
    ParseError { path: String, message: String },
}

/// Parse a JSON array of client records.
pub fn parse_clients(source: &str) -> Result<Vec<ClientRecord>, serde_json::Error> {
    serde_json::from_str(source)
}

/// Read and parse the client data file.
pub fn load_clients(path: &Path) -> Result<Vec<ClientRecord>, LoadError> {
    let content = fs::read_to_string(path).map_err(|e| LoadError::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let clients = parse_clients(&content).map_err(|e| LoadError::ParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    tracing::info!("Loaded {} clients from {}", clients.len(), path.display());

    Ok(clients)
}

/// Slugs that appear more than once, in order of their second appearance.
pub fn duplicate_slugs(clients: &[ClientRecord]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for client in clients {
        if !seen.insert(client.slug.as_str()) && !duplicates.contains(&client.slug.as_str()) {
            duplicates.push(client.slug.as_str());
        }
    }

    duplicates
}

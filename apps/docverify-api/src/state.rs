//! Application state for DocVerify API

use std::path::Path;

use anyhow::{Context, Result};
use docverify_core::{DocumentTable, LocalResolver, VerifierConfig};

pub struct AppState {
    pub resolver: LocalResolver,
    pub uppercase: bool,
}

impl AppState {
    /// Build state from a validated configuration
    pub fn from_config(config: VerifierConfig) -> Self {
        Self {
            resolver: LocalResolver::new(config.table),
            uppercase: config.uppercase,
        }
    }

    /// Load the document table from `table_path`, or use the demo table
    pub fn load(table_path: Option<&Path>, uppercase: bool) -> Result<Self> {
        let table = match table_path {
            Some(path) => {
                tracing::info!("Loading document table from {}", path.display());
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                DocumentTable::from_json(&json)?
            }
            None => {
                tracing::info!("No table file given, serving the demo table");
                DocumentTable::demo()
            }
        };

        let config = VerifierConfig::local(table)
            .with_uppercase(uppercase)
            .validated()?;
        tracing::info!("Loaded {} document(s)", config.table.len());

        Ok(Self::from_config(config))
    }
}

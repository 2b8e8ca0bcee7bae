//! Subcommand implementations.

pub mod compare;
pub mod evaluate;
pub mod grade;
pub mod init;
pub mod topics;
pub mod validate;

use std::path::Path;

use anyhow::Result;

use smartest_core::{KeywordCatalog, Scorer};

/// Load configuration and build the scorer and keyword catalog from it.
pub(crate) fn load_engine(config_path: Option<&Path>) -> Result<(Scorer, KeywordCatalog)> {
    let config = smartest_core::load_config_from(config_path)?;
    let catalog = KeywordCatalog::with_overrides(&config.keywords);
    Ok((Scorer::new(config.scoring), catalog))
}

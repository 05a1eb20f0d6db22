use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::catalog::Catalog;
use crate::config;
use crate::logging;
use crate::ui;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config_file: Option<PathBuf>,
    /// Categories given on the command line; skips the picker when set.
    pub categories: Vec<String>,
    /// Open the static catalog feed without showing the picker.
    pub static_feed: bool,
}

pub fn load_catalog(cfg: &config::Config) -> Result<Catalog> {
    match cfg.catalog.path.as_ref() {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("load catalog from {}", path.display())),
        None => Ok(Catalog::builtin().clone()),
    }
}

pub fn run(opts: RunOptions) -> Result<()> {
    let cfg = config::load(config::LoadOptions {
        config_file: opts.config_file,
        env_prefix: None,
    })
    .context("load config")?;
    let _log_guard = logging::init_or_warn(&cfg.log);

    let catalog = load_catalog(&cfg)?;
    tracing::info!(categories = catalog.len(), "catalog ready");

    let selection = if opts.static_feed {
        Some(Vec::new())
    } else if !opts.categories.is_empty() {
        Some(opts.categories)
    } else {
        None
    };

    let mut model = ui::Model::new(ui::Options {
        config: cfg,
        catalog,
        selection,
    });
    model.run()?;

    tracing::info!("exiting");
    Ok(())
}

use std::path::PathBuf;

use clap::Parser;

use reels_tui::app::{self, RunOptions};
use reels_tui::config;

/// Reels-TUI - Scroll a short-form video feed from the terminal.
#[derive(Debug, Parser)]
#[command(name = "reels", version, about)]
struct Cli {
    /// Path to a config file (defaults to the user config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start straight away with this category; repeat to add more
    #[arg(short, long = "category", value_name = "NAME")]
    categories: Vec<String>,

    /// Browse every catalog video in order instead of a shuffled playlist
    #[arg(long = "static", conflicts_with = "categories")]
    static_feed: bool,

    /// Print the available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.list_categories {
        if let Err(err) = list_categories(cli.config) {
            eprintln!("error: {err:?}");
            std::process::exit(1);
        }
        return;
    }

    let opts = RunOptions {
        config_file: cli.config,
        categories: cli.categories,
        static_feed: cli.static_feed,
    };
    if let Err(err) = app::run(opts) {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}

fn list_categories(config_file: Option<PathBuf>) -> anyhow::Result<()> {
    let cfg = config::load(config::LoadOptions {
        config_file,
        env_prefix: None,
    })?;
    let catalog = app::load_catalog(&cfg)?;
    for category in catalog.categories() {
        println!("{}\t{}", category.name, category.videos.len());
    }
    Ok(())
}

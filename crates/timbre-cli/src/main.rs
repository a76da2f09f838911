use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use timbre_ingest::Config;

mod commands;
mod tui;

use commands::QueryArgs;

#[derive(Debug, Parser)]
#[command(name = "timbre", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the song catalog CSV (default: ~/.local/share/timbre/filtered_track_df.csv)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Recommend songs close to a target audio profile
    ///
    /// Filters the catalog to one genre and release-year window, keeps the
    /// most popular matches (see `popularity_cap`), and lists them nearest
    /// first by Euclidean distance over acousticness, danceability, energy,
    /// instrumentalness, valence and tempo.
    ///
    /// Results are shown one page at a time (see `page_size`). Use --page to
    /// pick a later page or --all to print everything.
    ///
    /// Note that tempo is measured in beats per minute while the other
    /// features lie in [0, 1], so with the default `raw` scaling tempo
    /// dominates the distance. Pass --scaling min-max to weigh all six
    /// features equally.
    Recommend {
        #[command(flatten)]
        query: QueryArgs,

        /// Page to show (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Show every ranked song instead of a single page
        #[arg(long, conflicts_with = "page")]
        all: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Browse recommendations interactively
    Browse {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// List supported genres and how many catalog songs carry each
    Genres,
    /// Show catalog statistics
    Stats,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print one config value, or the whole config file
    Get {
        /// Config key (catalog_path, popularity_cap, page_size, genres, feature_scaling)
        key: Option<String>,
    },
    /// Set a value in the config file
    Set { key: String, value: String },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config management must work even when the config file is broken.
    if let Commands::Config { action } = cli.command {
        return match action {
            ConfigAction::Show => commands::config::show_config(),
            ConfigAction::Get { key } => commands::config::get_config(key),
            ConfigAction::Set { key, value } => commands::config::set_config(key, value),
            ConfigAction::Path => commands::config::show_path(),
            ConfigAction::Example => commands::config::show_example(),
            ConfigAction::Init => commands::config::init_config(),
        };
    }

    let mut config = match cli.catalog {
        Some(path) => Config::load_with_catalog_path(path)?,
        None => Config::load()?,
    };

    let logging = std::mem::take(&mut config.logging);
    twyg::setup(logging).map_err(|e| anyhow::anyhow!("Failed to set up logging: {:?}", e))?;

    match cli.command {
        Commands::Recommend {
            query,
            page,
            all,
            json,
        } => {
            commands::run_recommend(&config, &query, page, all, json)?;
        }
        Commands::Browse { query } => {
            commands::run_browse(&config, &query)?;
        }
        Commands::Genres => {
            commands::list_genres(&config)?;
        }
        Commands::Stats => {
            commands::show_stats(&config)?;
        }
        Commands::Config { .. } => unreachable!("handled before config is loaded"),
    }

    Ok(())
}

use anyhow::Result;
use timbre_ingest::Config;

use super::{build_recommender, open_catalog, QueryArgs};
use crate::tui::{self, App};

/// Launch the interactive browser, starting from the given query.
pub fn run_browse(config: &Config, args: &QueryArgs) -> Result<()> {
    let catalog = open_catalog(config)?;
    let recommender = build_recommender(&catalog, config, args.scaling)?;
    let query = args.to_query()?;

    log::info!(
        "Browsing {} songs ({} rows)",
        catalog.song_count(),
        catalog.len()
    );

    let app = App::new(recommender, &query, config.page_size)?;
    tui::run_tui(app)
}

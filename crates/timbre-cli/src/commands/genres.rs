use anyhow::Result;
use timbre_ingest::Config;

use super::open_catalog;

/// List the supported genres with their catalog row counts.
pub fn list_genres(config: &Config) -> Result<()> {
    let catalog = open_catalog(config)?;
    let counts = catalog.genre_counts();
    let genres = config.supported_genres();

    println!("Supported genres:\n");
    for genre in genres.iter() {
        let count = counts.get(genre.tag().as_str()).copied().unwrap_or(0);
        println!("  {:<14} {:>7} songs", genre.name(), count);
    }

    let unsupported = counts
        .keys()
        .filter(|tag| genres.resolve(tag).is_none())
        .count();
    if unsupported > 0 {
        println!(
            "\n  {} other genre tags in the catalog are not offered (see 'genres' in the config).",
            unsupported
        );
    }

    Ok(())
}

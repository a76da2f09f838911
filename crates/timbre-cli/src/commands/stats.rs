use anyhow::Result;
use timbre_ingest::Config;

use super::open_catalog;

pub fn show_stats(config: &Config) -> Result<()> {
    let catalog = open_catalog(config)?;
    let stats = catalog.stats();

    println!("\nTimbre Catalog\n");
    println!("  Catalog: {}", config.catalog_path.display());
    println!("  Songs: {}", stats.songs);
    println!("  Genre rows: {}", stats.rows);
    println!("  Distinct genre tags: {}", stats.genres);
    match stats.years {
        Some(years) => println!("  Release years: {}", years),
        None => println!("  Release years: -"),
    }

    println!("\n  Popularity cap: {}", config.popularity_cap);
    println!("  Page size: {}", config.page_size);
    println!("  Feature scaling: {}", config.feature_scaling);

    if stats.songs == 0 {
        println!("\n  The catalog is empty; point catalog_path at a populated CSV.");
    }

    Ok(())
}

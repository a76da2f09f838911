use anyhow::Result;
use timbre_ingest::Config;
use timbre_search::{BrowseSession, Recommendation};

use super::{build_recommender, open_catalog, QueryArgs};

/// Print one page (or all) of the recommendations for a query.
pub fn run_recommend(
    config: &Config,
    args: &QueryArgs,
    page: usize,
    all: bool,
    json: bool,
) -> Result<()> {
    let catalog = open_catalog(config)?;
    let recommender = build_recommender(&catalog, config, args.scaling)?;
    let query = args.to_query()?;
    let results = recommender.recommend(&query)?;

    let mut session = BrowseSession::new(config.page_size);
    session.observe(&query);
    if !all {
        session.jump_to_page(page.saturating_sub(1));
    }
    let shown = if all {
        results.as_slice()
    } else {
        session.current_page(&results)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    println!(
        "\n{} songs for {} {} ({} scaling)\n",
        results.len(),
        query.genre,
        query.years,
        recommender.options().scaling()
    );

    if results.is_empty() {
        println!("  No songs match this genre and year range.");
        return Ok(());
    }
    if shown.is_empty() {
        println!("  No songs left to recommend");
        return Ok(());
    }

    let offset = if all { 0 } else { session.start() };
    for (i, rec) in shown.iter().enumerate() {
        print_recommendation(offset + i + 1, rec);
    }

    if !all {
        let pages = results.len().div_ceil(session.page_size());
        let current = session.page_number() + 1;
        if current < pages {
            println!("Page {} of {}. Use --page {} for more.", current, pages, current + 1);
        } else {
            println!("Page {} of {}.", current, pages);
        }
    }

    Ok(())
}

fn print_recommendation(rank: usize, rec: &Recommendation) {
    let title = rec.title.as_deref().unwrap_or("Unknown Track");
    match &rec.artist {
        Some(artist) => println!("{:>4}. {} - {}", rank, title, artist),
        None => println!("{:>4}. {}", rank, title),
    }
    println!(
        "      distance {:.3}  popularity {}  released {}",
        rec.distance, rec.popularity, rec.release_year
    );
    println!("      {}", rec.uri.embed_url());

    let features: Vec<String> = rec
        .features
        .iter()
        .map(|(feature, value)| format!("{} {:.2}", feature, value))
        .collect();
    println!("      {}\n", features.join("  "));
}

//! End-to-end tests: CSV catalog on disk through to ranked, paged results.

use std::io::Write;

use tempfile::NamedTempFile;
use timbre_core::model::AudioFeatures;
use timbre_ingest::load_catalog;
use timbre_search::{BrowseSession, Query, Recommender};

const HEADER: &str = "uri,name,artists,genres,release_year,popularity,acousticness,danceability,energy,instrumentalness,valence,tempo";

const TARGET: [f64; 6] = [0.1, 0.2, 0.3, 0.4, 0.2, 118.0];

fn write_catalog(rows: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

/// A deterministic spread of songs across a few genres and years.
fn synthetic_rows(count: usize) -> Vec<String> {
    let genre_lists = [
        "['pop']",
        "['dance pop', 'pop']",
        "['rock']",
        "['pop', 'electropop']",
    ];
    (0..count)
        .map(|i| {
            let genres = genre_lists[i % genre_lists.len()];
            let year = 2010 + (i % 10) as i32;
            let popularity = (i * 37 % 101) as f64;
            let unit = (i * 13 % 100) as f64 / 100.0;
            let tempo = 60.0 + (i * 7 % 140) as f64;
            format!(
                "id{i},Song {i},Artist {i},\"{genres}\",{year},{popularity},{unit},{unit},{unit},0,{unit},{tempo}"
            )
        })
        .collect()
}

#[test]
fn test_recommend_from_csv_file() {
    let file = write_catalog(&[
        r#"far,Far,A,"['pop']",2015,90,0.9,0.9,0.9,0.9,0.9,200"#.to_string(),
        r#"close,Close,B,"['pop', 'dance pop']",2016,50,0.1,0.2,0.3,0.4,0.2,119"#.to_string(),
        r#"medium,Medium,C,"['pop']",2017,10,0.2,0.3,0.4,0.5,0.3,140"#.to_string(),
        r#"jazz,Jazz,D,"['jazz']",2016,99,0.1,0.2,0.3,0.4,0.2,118"#.to_string(),
    ]);
    let catalog = load_catalog(file.path()).unwrap();
    assert_eq!(catalog.song_count(), 4);
    assert_eq!(catalog.len(), 5);

    let recommender = Recommender::new(&catalog);
    let results = recommender.recommend_for("Pop", 2015, 2017, &TARGET).unwrap();
    let uris: Vec<_> = results.iter().map(|r| r.uri.as_str()).collect();
    assert_eq!(uris, ["close", "medium", "far"]);
}

#[test]
fn test_ranking_is_non_decreasing_and_capped() {
    let file = write_catalog(&synthetic_rows(3000));
    let catalog = load_catalog(file.path()).unwrap();
    let recommender = Recommender::new(&catalog);

    let query = Query::new("Pop", 2010, 2019, &TARGET).unwrap();
    let results = recommender.recommend(&query).unwrap();

    // Three of the four genre lists carry 'pop'.
    let matching = catalog
        .rows()
        .iter()
        .filter(|r| r.genre == "pop" && query.years.contains(r.release_year))
        .count();
    assert!(matching > 500);
    assert_eq!(results.len(), 500);

    let target = AudioFeatures::new(TARGET);
    for pair in results.windows(2) {
        let a = target.euclidean_distance(&pair[0].features);
        let b = target.euclidean_distance(&pair[1].features);
        assert!(a <= b, "ranking out of order: {} > {}", a, b);
    }

    // Nothing less popular than the least popular retained song was left out
    // in favour of it.
    let floor = results
        .iter()
        .map(|r| r.popularity)
        .fold(f64::INFINITY, f64::min);
    let above_floor = catalog
        .rows()
        .iter()
        .filter(|r| {
            r.genre == "pop" && query.years.contains(r.release_year) && r.popularity > floor
        })
        .count();
    assert!(above_floor <= 500);
    for row in catalog.rows().iter().filter(|r| {
        r.genre == "pop" && query.years.contains(r.release_year) && r.popularity > floor
    }) {
        assert!(results.iter().any(|r| r.uri == row.uri));
    }
}

#[test]
fn test_identical_queries_are_deterministic() {
    let file = write_catalog(&synthetic_rows(800));
    let catalog = load_catalog(file.path()).unwrap();
    let recommender = Recommender::new(&catalog);

    let first = recommender.recommend_for("dance pop", 2012, 2018, &TARGET).unwrap();
    let second = recommender.recommend_for("Dance Pop", 2012, 2018, &TARGET).unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_jazz_outside_catalog_is_empty() {
    let file = write_catalog(&synthetic_rows(100));
    let catalog = load_catalog(file.path()).unwrap();
    let recommender = Recommender::new(&catalog);

    let results = recommender.recommend_for("Jazz", 1990, 1991, &TARGET).unwrap();
    assert!(results.is_empty());

    let mut session = BrowseSession::default();
    session.observe(&Query::new("Jazz", 1990, 1991, &TARGET).unwrap());
    assert!(session.is_exhausted(results.len()));
}

#[test]
fn test_paging_a_real_result() {
    let file = write_catalog(&synthetic_rows(200));
    let catalog = load_catalog(file.path()).unwrap();
    let recommender = Recommender::new(&catalog);

    let query = Query::new("Rock", 2010, 2019, &TARGET).unwrap();
    let results = recommender.recommend(&query).unwrap();
    assert_eq!(results.len(), 50);

    let mut session = BrowseSession::default();
    session.observe(&query);
    let mut seen = Vec::new();
    while !session.is_exhausted(results.len()) {
        seen.extend(session.current_page(&results).iter().map(|r| r.uri.clone()));
        session.recommend_more(results.len());
    }
    let all: Vec<_> = results.iter().map(|r| r.uri.clone()).collect();
    assert_eq!(seen, all);
}

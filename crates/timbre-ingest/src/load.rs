//! CSV catalog reader.
//!
//! The catalog is a CSV file with a header row. Required columns:
//! `uri, genres, release_year, popularity, acousticness, danceability,
//! energy, instrumentalness, valence, tempo`. Optional `name`/`track_name`
//! and `artists`/`artists_name` columns are carried through for display.
//! Any other column is ignored.

use std::io;
use std::path::Path;

use serde::Deserialize;
use timbre_core::model::{AudioFeatures, SongRecord};
use timbre_core::CatalogIndex;

use crate::error::{LoadError, LoadResult};

/// One raw CSV row.
#[derive(Debug, Deserialize)]
struct CatalogCsvRow {
    uri: String,
    #[serde(default, alias = "name", alias = "track_name")]
    title: Option<String>,
    #[serde(default, alias = "artists", alias = "artists_name", alias = "artist_name")]
    artist: Option<String>,
    genres: String,
    release_year: i32,
    popularity: f64,
    acousticness: f64,
    danceability: f64,
    energy: f64,
    instrumentalness: f64,
    valence: f64,
    tempo: f64,
}

impl CatalogCsvRow {
    fn into_song(self) -> timbre_core::Result<SongRecord> {
        let features = AudioFeatures::new([
            self.acousticness,
            self.danceability,
            self.energy,
            self.instrumentalness,
            self.valence,
            self.tempo,
        ]);
        features.ensure_finite()?;
        if !self.popularity.is_finite() {
            return Err(timbre_core::Error::NonFinitePopularity {
                uri: self.uri,
                value: self.popularity,
            });
        }

        let mut song = SongRecord::new(
            self.uri,
            self.genres,
            self.release_year,
            self.popularity,
            features,
        );
        song.title = self.title.filter(|t| !t.is_empty());
        song.artist = self.artist.filter(|a| !a.is_empty());
        Ok(song)
    }
}

/// Load and expand the catalog stored at `path`.
///
/// # Errors
///
/// Returns [`LoadError::Open`] if the file cannot be read, and any error
/// [`read_catalog`] reports for its content.
pub fn load_catalog(path: &Path) -> LoadResult<CatalogIndex> {
    log::info!("Loading catalog from {}", path.display());

    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let catalog = read_records(reader)?;
    log::info!(
        "Catalog has {} songs expanded into {} genre rows",
        catalog.song_count(),
        catalog.len()
    );
    Ok(catalog)
}

/// Read and expand a catalog from any CSV source.
///
/// # Errors
///
/// Fails on the first row that cannot be decoded, holds a non-finite
/// feature or popularity value, or carries a malformed genre list.
pub fn read_catalog<R: io::Read>(source: R) -> LoadResult<CatalogIndex> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    read_records(reader)
}

fn read_records<R: io::Read>(mut reader: csv::Reader<R>) -> LoadResult<CatalogIndex> {
    let mut songs = Vec::new();

    for (index, result) in reader.deserialize::<CatalogCsvRow>().enumerate() {
        // Header is line 1.
        let fallback_line = index as u64 + 2;
        let row = result.map_err(|source| LoadError::Row {
            line: source
                .position()
                .map(|p| p.line())
                .unwrap_or(fallback_line),
            source,
        })?;
        let song = row.into_song().map_err(|source| LoadError::InvalidRow {
            line: fallback_line,
            source,
        })?;
        songs.push(song);
    }

    if songs.is_empty() {
        log::warn!("Catalog contains no songs");
    }

    Ok(CatalogIndex::build(songs)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "uri,name,artists,genres,release_year,popularity,acousticness,danceability,energy,instrumentalness,valence,tempo\n";

    fn csv(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push_str(row);
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_read_expands_genres() {
        let data = csv(&[
            r#"id1,Closer,The Chainsmokers,"['dance pop', 'edm', 'pop']",2016,86,0.414,0.748,0.524,0,0.661,95.01"#,
            r#"id2,Creep,Radiohead,"['rock']",1992,80,0.0102,0.515,0.43,0.000141,0.104,91.841"#,
        ]);
        let catalog = read_catalog(data.as_bytes()).unwrap();
        assert_eq!(catalog.song_count(), 2);
        assert_eq!(catalog.len(), 4);

        let first = &catalog.rows()[0];
        assert_eq!(first.uri.as_str(), "id1");
        assert_eq!(first.genre, "dance pop");
        assert_eq!(first.title.as_deref(), Some("Closer"));
        assert_eq!(first.artist.as_deref(), Some("The Chainsmokers"));
        assert_eq!(first.release_year, 2016);
        assert!((first.features.as_array()[5] - 95.01).abs() < 1e-9);
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let data = "uri,genres,release_year,popularity,acousticness,danceability,energy,instrumentalness,valence,tempo,extra\n\
                    id1,\"['pop']\",2016,50,0.1,0.2,0.3,0.4,0.5,120,ignored\n";
        let catalog = read_catalog(data.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.rows()[0].title.is_none());
    }

    #[test]
    fn test_missing_column_is_row_error() {
        let data = "uri,genres,release_year\nid1,\"['pop']\",2016\n";
        let err = read_catalog(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Row { .. }));
        assert!(err.is_data_error());
    }

    #[test]
    fn test_bad_number_reports_line() {
        let data = csv(&[
            r#"id1,a,b,"['pop']",2016,50,0.1,0.2,0.3,0.4,0.5,120"#,
            r#"id2,a,b,"['pop']",twenty,50,0.1,0.2,0.3,0.4,0.5,120"#,
        ]);
        let err = read_catalog(data.as_bytes()).unwrap_err();
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_non_finite_feature_is_rejected() {
        let data = csv(&[r#"id1,a,b,"['pop']",2016,50,0.1,0.2,NaN,0.4,0.5,120"#]);
        let err = read_catalog(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidRow { line: 2, .. }));
    }

    #[test]
    fn test_non_finite_popularity_is_rejected() {
        let data = csv(&[
            r#"id1,a,b,"['pop']",2016,50,0.1,0.2,0.3,0.4,0.5,120"#,
            r#"id2,a,b,"['pop']",2016,NaN,0.1,0.2,0.3,0.4,0.5,120"#,
        ]);
        let err = read_catalog(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidRow {
                line: 3,
                source: timbre_core::Error::NonFinitePopularity { .. }
            }
        ));
        assert!(err.is_data_error());
    }

    #[test]
    fn test_malformed_genres_abort_load() {
        let data = csv(&[
            r#"id1,a,b,"['pop']",2016,50,0.1,0.2,0.3,0.4,0.5,120"#,
            r#"id2,a,b,"['pop', 'rock'",2016,50,0.1,0.2,0.3,0.4,0.5,120"#,
        ]);
        let err = read_catalog(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Catalog(timbre_core::Error::MalformedGenres { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_catalog(Path::new("/nonexistent/timbre/catalog.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert!(!err.is_data_error());
    }
}

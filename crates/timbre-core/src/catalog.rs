//! The genre-expanded, read-only song catalog.
//!
//! Each raw [`SongRecord`] carries a list of genre tags; the catalog holds one
//! [`CatalogRow`] per (song, tag) pair so that queries can filter on a single
//! genre column.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::model::{CatalogRow, SongRecord, TrackUri};
use crate::taxonomy::YearRange;

/// Most songs a single query may retain after popularity capping.
pub const MAX_POPULARITY_CAP: usize = 1024;

/// The queryable catalog. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    rows: Vec<CatalogRow>,
    song_count: usize,
}

/// Summary figures about a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub songs: usize,
    pub rows: usize,
    pub genres: usize,
    pub years: Option<YearRange>,
}

impl CatalogIndex {
    /// Expand raw songs into one row per genre tag.
    ///
    /// A song with `k` distinct tags yields exactly `k` rows. If the same
    /// uri appears in several raw records only the first is kept, so a
    /// (uri, genre) pair never occurs twice.
    ///
    /// # Errors
    ///
    /// Fails on the first song whose genre list cannot be parsed or whose
    /// popularity is not a finite number; no partial catalog is returned.
    pub fn build<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = SongRecord>,
    {
        let mut rows = Vec::new();
        let mut seen: HashMap<TrackUri, Vec<String>> = HashMap::new();
        let mut duplicates = 0usize;

        for song in records {
            let tags = song.genre_tags()?;
            if !song.popularity.is_finite() {
                return Err(Error::NonFinitePopularity {
                    uri: song.uri.to_string(),
                    value: song.popularity,
                });
            }
            if let Some(kept) = seen.get(&song.uri) {
                duplicates += 1;
                let dropped: Vec<&String> = tags.iter().filter(|t| !kept.contains(*t)).collect();
                if dropped.is_empty() {
                    log::debug!("Skipping repeated catalog entry for {}", song.uri);
                } else {
                    log::debug!(
                        "Skipping repeated catalog entry for {}; its extra genres {:?} are dropped",
                        song.uri,
                        dropped
                    );
                }
                continue;
            }
            seen.insert(song.uri.clone(), tags.clone());
            for tag in tags {
                let position = rows.len();
                rows.push(CatalogRow::from_song(&song, tag, position));
            }
        }

        if duplicates > 0 {
            log::warn!("Ignored {} repeated catalog entries", duplicates);
        }

        let song_count = seen.len();
        log::debug!(
            "Expanded {} songs into {} catalog rows",
            song_count,
            rows.len()
        );

        Ok(Self { rows, song_count })
    }

    #[must_use]
    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    /// Number of expanded rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct songs the rows were expanded from.
    #[must_use]
    pub const fn song_count(&self) -> usize {
        self.song_count
    }

    /// Row count per genre tag, sorted by tag.
    #[must_use]
    pub fn genre_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.genre.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Earliest and latest release years present, if any.
    #[must_use]
    pub fn year_span(&self) -> Option<YearRange> {
        let first = self.rows.first()?;
        let start = YearRange::new(first.release_year, first.release_year);
        Some(
            self.rows
                .iter()
                .fold(start, |range, row| range.including(row.release_year)),
        )
    }

    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            songs: self.song_count,
            rows: self.rows.len(),
            genres: self.genre_counts().len(),
            years: self.year_span(),
        }
    }
}

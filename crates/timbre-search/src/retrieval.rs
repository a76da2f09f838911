//! Recommendation queries against a [`CatalogIndex`].
//!
//! A query runs in four steps:
//!
//! 1. keep the rows whose genre tag equals the lowercased query genre and
//!    whose release year falls inside the window,
//! 2. keep the `popularity_cap` most popular of those,
//! 3. index their feature vectors in a fresh k-d tree,
//! 4. rank all of them by Euclidean distance to the target.
//!
//! Ties in popularity and in distance are broken by catalog position, so
//! identical queries always produce identical results.

use std::cmp::Ordering;

use serde::Serialize;
use timbre_core::model::{AudioFeatures, CatalogRow, FeatureScaling, TrackUri};
use timbre_core::taxonomy::{SupportedGenres, YearRange};
use timbre_core::CatalogIndex;

use crate::error::{QueryError, QueryResult};
use crate::neighbors::{NeighborIndex, LEAF_CAPACITY};
use crate::query::Query;
use crate::scaling::Scaler;

/// Matching songs ranked per query unless configured otherwise.
pub const DEFAULT_POPULARITY_CAP: usize = 500;

pub use timbre_core::MAX_POPULARITY_CAP;

// The ranking tree must hold every retained candidate in one leaf.
const _: () = assert!(MAX_POPULARITY_CAP <= LEAF_CAPACITY);

/// Tunables for a [`Recommender`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendOptions {
    popularity_cap: usize,
    scaling: FeatureScaling,
}

impl RecommendOptions {
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidOptions`] unless `popularity_cap` is in
    /// `1..=MAX_POPULARITY_CAP`.
    pub fn new(popularity_cap: usize, scaling: FeatureScaling) -> QueryResult<Self> {
        if popularity_cap == 0 || popularity_cap > MAX_POPULARITY_CAP {
            return Err(QueryError::InvalidOptions(format!(
                "popularity cap must be between 1 and {}, got {}",
                MAX_POPULARITY_CAP, popularity_cap
            )));
        }
        Ok(Self {
            popularity_cap,
            scaling,
        })
    }

    #[must_use]
    pub const fn popularity_cap(&self) -> usize {
        self.popularity_cap
    }

    #[must_use]
    pub const fn scaling(&self) -> FeatureScaling {
        self.scaling
    }
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            popularity_cap: DEFAULT_POPULARITY_CAP,
            scaling: FeatureScaling::Raw,
        }
    }
}

/// One ranked song.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub uri: TrackUri,
    /// The song's feature vector in raw units.
    pub features: AudioFeatures,
    /// Distance to the target, in the space selected by [`FeatureScaling`].
    pub distance: f64,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub popularity: f64,
    pub release_year: i32,
}

impl Recommendation {
    fn from_row(row: &CatalogRow, distance: f64) -> Self {
        Self {
            uri: row.uri.clone(),
            features: row.features,
            distance,
            title: row.title.clone(),
            artist: row.artist.clone(),
            popularity: row.popularity,
            release_year: row.release_year,
        }
    }
}

/// Answers recommendation queries against a shared, read-only catalog.
///
/// Holds no per-query state, so one recommender may serve any number of
/// queries, from any number of threads.
#[derive(Debug, Clone)]
pub struct Recommender<'a> {
    catalog: &'a CatalogIndex,
    genres: SupportedGenres,
    options: RecommendOptions,
}

impl<'a> Recommender<'a> {
    #[must_use]
    pub fn new(catalog: &'a CatalogIndex) -> Self {
        Self {
            catalog,
            genres: SupportedGenres::default(),
            options: RecommendOptions::default(),
        }
    }

    #[must_use]
    pub fn with_genres(mut self, genres: SupportedGenres) -> Self {
        self.genres = genres;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: RecommendOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn catalog(&self) -> &'a CatalogIndex {
        self.catalog
    }

    #[must_use]
    pub const fn genres(&self) -> &SupportedGenres {
        &self.genres
    }

    #[must_use]
    pub const fn options(&self) -> &RecommendOptions {
        &self.options
    }

    /// Rank the songs matching `query`, nearest first.
    ///
    /// An empty result is not an error: it means no song of that genre was
    /// released inside the window.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnsupportedGenre`] if the genre is not in the
    /// supported list.
    pub fn recommend(&self, query: &Query) -> QueryResult<Vec<Recommendation>> {
        let genre = self
            .genres
            .resolve(&query.genre)
            .ok_or_else(|| QueryError::UnsupportedGenre {
                genre: query.genre.clone(),
                supported: self.genres.joined(),
            })?;

        let candidates = select_candidates(
            self.catalog.rows(),
            &genre.tag(),
            query.years,
            self.options.popularity_cap,
        );
        log::debug!(
            "Query {} {}: {} candidate songs",
            genre,
            query.years,
            candidates.len()
        );

        Ok(rank(&candidates, &query.target, self.options.scaling))
    }

    /// Convenience form of [`Recommender::recommend`] taking the target as a
    /// plain slice.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidTarget`] if `target` is not six finite
    /// values, and anything [`Recommender::recommend`] returns.
    pub fn recommend_for(
        &self,
        genre: &str,
        start_year: i32,
        end_year: i32,
        target: &[f64],
    ) -> QueryResult<Vec<Recommendation>> {
        let query = Query::new(genre, start_year, end_year, target)?;
        self.recommend(&query)
    }
}

fn by_popularity(a: &&CatalogRow, b: &&CatalogRow) -> Ordering {
    b.popularity
        .total_cmp(&a.popularity)
        .then_with(|| a.position.cmp(&b.position))
}

/// The rows of one genre and year window, most popular first, capped at
/// `cap`.
///
/// `genre_tag` is compared verbatim against each row's tag.
pub fn select_candidates<'r>(
    rows: &'r [CatalogRow],
    genre_tag: &str,
    years: YearRange,
    cap: usize,
) -> Vec<&'r CatalogRow> {
    let mut matches: Vec<&CatalogRow> = rows
        .iter()
        .filter(|row| row.genre == genre_tag && years.contains(row.release_year))
        .collect();

    if matches.len() > cap {
        matches.select_nth_unstable_by(cap, by_popularity);
        matches.truncate(cap);
    }
    matches.sort_by(by_popularity);
    matches
}

/// Order `candidates` by distance to `target`, nearest first.
///
/// Candidates must number at most [`MAX_POPULARITY_CAP`].
pub fn rank(
    candidates: &[&CatalogRow],
    target: &AudioFeatures,
    scaling: FeatureScaling,
) -> Vec<Recommendation> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let scaler = Scaler::fit(scaling, candidates.iter().map(|row| &row.features));
    let points: Vec<AudioFeatures> = candidates
        .iter()
        .map(|row| scaler.apply(&row.features))
        .collect();
    let target = scaler.apply(target);

    let arrays: Vec<_> = points.iter().map(|p| *p.as_array()).collect();
    let index = NeighborIndex::build(&arrays);

    // Re-measure exactly and settle ties by catalog position.
    let mut ranked: Vec<(usize, f64)> = index
        .nearest(target.as_array())
        .into_iter()
        .map(|n| (n.index, target.euclidean_distance(&points[n.index])))
        .collect();
    ranked.sort_by(|a, b| {
        a.1.total_cmp(&b.1)
            .then_with(|| candidates[a.0].position.cmp(&candidates[b.0].position))
    });

    ranked
        .into_iter()
        .map(|(i, distance)| Recommendation::from_row(candidates[i], distance))
        .collect()
}

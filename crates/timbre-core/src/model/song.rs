use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::features::AudioFeatures;
use crate::model::ids::TrackUri;
use crate::taxonomy::genre::parse_genre_list;

/// One song as it appears in the raw catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRecord {
    pub uri: TrackUri,

    /// Track title, if the source catalog carries one.
    pub title: Option<String>,

    /// Artist credit, if the source catalog carries one.
    pub artist: Option<String>,

    /// Genre tags in their printed-list form, e.g. `['dance pop', 'pop']`.
    pub genres: String,

    pub release_year: i32,

    /// Higher is more popular. Only used to cap query results.
    pub popularity: f64,

    pub features: AudioFeatures,
}

impl SongRecord {
    #[must_use]
    pub fn new(
        uri: impl Into<TrackUri>,
        genres: impl Into<String>,
        release_year: i32,
        popularity: f64,
        features: AudioFeatures,
    ) -> Self {
        Self {
            uri: uri.into(),
            title: None,
            artist: None,
            genres: genres.into(),
            release_year,
            popularity,
            features,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Parse the printed genre list into individual tags.
    pub fn genre_tags(&self) -> Result<Vec<String>> {
        parse_genre_list(self.uri.as_str(), &self.genres)
    }
}

/// One (song, genre) pair of the expanded catalog.
///
/// Every field except `genre` is copied verbatim from the [`SongRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub uri: TrackUri,
    pub title: Option<String>,
    pub artist: Option<String>,

    /// A single genre tag.
    pub genre: String,

    pub release_year: i32,
    pub popularity: f64,
    pub features: AudioFeatures,

    /// Index of this row within the catalog, used to break ties.
    pub position: usize,
}

impl CatalogRow {
    pub(crate) fn from_song(song: &SongRecord, genre: String, position: usize) -> Self {
        Self {
            uri: song.uri.clone(),
            title: song.title.clone(),
            artist: song.artist.clone(),
            genre,
            release_year: song.release_year,
            popularity: song.popularity,
            features: song.features,
            position,
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Genres offered for recommendation unless configured otherwise.
pub const DEFAULT_GENRES: [&str; 11] = [
    "Dance Pop",
    "Electronic",
    "Electropop",
    "Hip Hop",
    "Jazz",
    "K-pop",
    "Latin",
    "Pop",
    "Pop Rap",
    "R&B",
    "Rock",
];

/// A genre a user can ask for.
///
/// The display name keeps its casing (e.g. "Hip Hop"); catalog rows are
/// matched against [`Genre::tag`], its lowercase form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genre {
    name: String,
}

impl Genre {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tag catalog rows carry for this genre.
    #[must_use]
    pub fn tag(&self) -> String {
        self.name.to_lowercase()
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The enumerated set of genres queries may name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupportedGenres {
    genres: Vec<Genre>,
}

impl SupportedGenres {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            genres: names.into_iter().map(Genre::new).collect(),
        }
    }

    /// Find a supported genre by name, ignoring case.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&Genre> {
        let wanted = name.trim().to_lowercase();
        self.genres.iter().find(|g| g.tag() == wanted)
    }

    /// Position of a genre within the list, ignoring case.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.genres.iter().position(|g| g.tag() == wanted)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Genre> {
        self.genres.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Genre> {
        self.genres.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genres.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    /// Comma-separated display names, for error messages.
    #[must_use]
    pub fn joined(&self) -> String {
        self.genres
            .iter()
            .map(Genre::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for SupportedGenres {
    fn default() -> Self {
        Self::from_names(DEFAULT_GENRES)
    }
}

/// Split a printed list of quoted strings into its items.
///
/// The catalog stores each song's genres as e.g. `['dance pop', 'pop']`:
/// one bracket at each end, items separated by `", "`, each item wrapped in
/// a matching pair of single or double quotes. Genre names are assumed not
/// to contain `", "` themselves. `[]` yields no tags, and a tag repeated
/// within one list is kept once.
///
/// `uri` only serves to identify the song in the error.
///
/// # Errors
///
/// Returns [`Error::MalformedGenres`] when the brackets or quotes are
/// missing or unbalanced, or when an item is empty.
pub fn parse_genre_list(uri: &str, raw: &str) -> Result<Vec<String>> {
    let malformed = |reason: &'static str| Error::MalformedGenres {
        uri: uri.to_string(),
        raw: raw.to_string(),
        reason,
    };

    let inner = raw
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| malformed("expected a bracketed list"))?;

    if inner.is_empty() {
        return Ok(Vec::new());
    }

    let mut tags: Vec<String> = Vec::new();
    for token in inner.split(", ") {
        let tag = unquote(token).ok_or_else(|| malformed("expected every item to be quoted"))?;
        if tag.is_empty() {
            return Err(malformed("empty genre tag"));
        }
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }

    Ok(tags)
}

fn unquote(token: &str) -> Option<&str> {
    let bytes = token.as_bytes();
    let (&first, &last) = (bytes.first()?, bytes.last()?);
    if bytes.len() >= 2 && (first == b'\'' || first == b'"') && first == last {
        Some(&token[1..token.len() - 1])
    } else {
        None
    }
}

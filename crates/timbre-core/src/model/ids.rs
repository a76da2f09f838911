use serde::{Deserialize, Serialize};
use std::fmt;

const SPOTIFY_TRACK_PREFIX: &str = "spotify:track:";
const EMBED_BASE_URL: &str = "https://open.spotify.com/embed/track/";

/// Opaque identifier for a song, used to locate playable media.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackUri(String);

impl TrackUri {
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare track id, without any `spotify:track:` prefix.
    #[must_use]
    pub fn track_id(&self) -> &str {
        self.0
            .strip_prefix(SPOTIFY_TRACK_PREFIX)
            .unwrap_or(&self.0)
    }

    /// URL of the embeddable player for this track.
    #[must_use]
    pub fn embed_url(&self) -> String {
        format!("{}{}", EMBED_BASE_URL, self.track_id())
    }
}

impl fmt::Display for TrackUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TrackUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TrackUri {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

impl From<String> for TrackUri {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

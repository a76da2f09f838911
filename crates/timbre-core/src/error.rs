use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed genre list for {uri}: {reason} (raw value: {raw:?})")]
    MalformedGenres {
        uri: String,
        raw: String,
        reason: &'static str,
    },

    #[error("expected {expected} audio features, got {actual}")]
    FeatureDimension { expected: usize, actual: usize },

    #[error("audio feature {feature} is not a finite number: {value}")]
    NonFiniteFeature { feature: &'static str, value: f64 },

    #[error("popularity of {uri} is not a finite number: {value}")]
    NonFinitePopularity { uri: String, value: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;

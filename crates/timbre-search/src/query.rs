use timbre_core::model::AudioFeatures;
use timbre_core::taxonomy::YearRange;

use crate::error::{QueryError, QueryResult};

/// One recommendation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Genre name as the user gave it; matched case-insensitively.
    pub genre: String,
    pub years: YearRange,
    pub target: AudioFeatures,
}

impl Query {
    /// Build a query from a raw target vector.
    ///
    /// A `start_year` after `end_year` is accepted and simply matches no
    /// songs.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidTarget`] if `target` is not six finite
    /// values.
    pub fn new(
        genre: impl Into<String>,
        start_year: i32,
        end_year: i32,
        target: &[f64],
    ) -> QueryResult<Self> {
        let target = AudioFeatures::from_slice(target).map_err(QueryError::InvalidTarget)?;
        Ok(Self::with_features(
            genre,
            YearRange::new(start_year, end_year),
            target,
        ))
    }

    #[must_use]
    pub fn with_features(genre: impl Into<String>, years: YearRange, target: AudioFeatures) -> Self {
        Self {
            genre: genre.into(),
            years,
            target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_six_values() {
        let query = Query::new("Pop", 2015, 2017, &[0.1, 0.2, 0.3, 0.4, 0.2, 118.0]).unwrap();
        assert_eq!(query.genre, "Pop");
        assert_eq!(query.years, YearRange::new(2015, 2017));
        assert!((query.target.as_array()[5] - 118.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_new_rejects_wrong_dimension() {
        let err = Query::new("Pop", 2015, 2017, &[0.1, 0.2, 0.3, 0.4, 0.2]).unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidTarget(timbre_core::Error::FeatureDimension { actual: 5, .. })
        ));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_new_accepts_inverted_years() {
        let query = Query::new("Pop", 2019, 2015, &[0.0; 6]).unwrap();
        assert!(query.years.is_empty());
    }

    #[test]
    fn test_new_rejects_infinite_value() {
        let err = Query::new("Pop", 2015, 2017, &[0.0, 0.0, 0.0, 0.0, 0.0, f64::INFINITY])
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidTarget(_)));
    }
}

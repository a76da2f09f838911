use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Number of audio features in a feature vector.
pub const FEATURE_COUNT: usize = 6;

/// One of the six audio descriptors, in their fixed vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFeature {
    Acousticness,
    Danceability,
    Energy,
    Instrumentalness,
    Valence,
    Tempo,
}

impl AudioFeature {
    /// All features in vector order.
    pub const ALL: [Self; FEATURE_COUNT] = [
        Self::Acousticness,
        Self::Danceability,
        Self::Energy,
        Self::Instrumentalness,
        Self::Valence,
        Self::Tempo,
    ];

    /// Column name as used in the source catalog.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Acousticness => "acousticness",
            Self::Danceability => "danceability",
            Self::Energy => "energy",
            Self::Instrumentalness => "instrumentalness",
            Self::Valence => "valence",
            Self::Tempo => "tempo",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Acousticness => "Acousticness",
            Self::Danceability => "Danceability",
            Self::Energy => "Energy",
            Self::Instrumentalness => "Instrumentalness",
            Self::Valence => "Valence",
            Self::Tempo => "Tempo",
        }
    }

    /// Position of this feature within a feature vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The range a user can pick a target value from.
    ///
    /// Tempo is in beats per minute; the rest are unit-scaled. The catalog
    /// itself is not checked against these bounds.
    #[must_use]
    pub const fn range(self) -> (f64, f64) {
        match self {
            Self::Tempo => (0.0, 244.0),
            _ => (0.0, 1.0),
        }
    }

    /// Default target value offered to a new session.
    #[must_use]
    pub const fn default_target(self) -> f64 {
        match self {
            Self::Acousticness => 0.1,
            Self::Danceability | Self::Valence => 0.2,
            Self::Energy => 0.3,
            Self::Instrumentalness => 0.4,
            Self::Tempo => 118.0,
        }
    }

    /// Increment used when nudging a target value interactively.
    #[must_use]
    pub const fn step(self) -> f64 {
        match self {
            Self::Tempo => 2.0,
            _ => 0.05,
        }
    }
}

impl fmt::Display for AudioFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A six-dimensional audio feature vector in [`AudioFeature::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures([f64; FEATURE_COUNT]);

impl AudioFeatures {
    #[must_use]
    pub const fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Build a vector from an arbitrary slice, checking its shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FeatureDimension`] if the slice does not hold exactly
    /// [`FEATURE_COUNT`] values, or [`Error::NonFiniteFeature`] if any value
    /// is NaN or infinite.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let array: [f64; FEATURE_COUNT] =
            values.try_into().map_err(|_| Error::FeatureDimension {
                expected: FEATURE_COUNT,
                actual: values.len(),
            })?;
        let features = Self(array);
        features.ensure_finite()?;
        Ok(features)
    }

    /// The target every new session starts from.
    #[must_use]
    pub fn default_target() -> Self {
        Self(AudioFeature::ALL.map(AudioFeature::default_target))
    }

    #[must_use]
    pub const fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    #[must_use]
    pub const fn get(&self, feature: AudioFeature) -> f64 {
        self.0[feature.index()]
    }

    pub fn set(&mut self, feature: AudioFeature, value: f64) {
        self.0[feature.index()] = value;
    }

    /// Iterate `(feature, value)` pairs in vector order.
    pub fn iter(&self) -> impl Iterator<Item = (AudioFeature, f64)> + '_ {
        AudioFeature::ALL
            .into_iter()
            .map(move |f| (f, self.get(f)))
    }

    /// The unit-scaled part of the vector (everything but tempo), as drawn
    /// in a song's visual profile.
    #[must_use]
    pub fn profile(&self) -> [(AudioFeature, f64); FEATURE_COUNT - 1] {
        let mut out = [(AudioFeature::Acousticness, 0.0); FEATURE_COUNT - 1];
        for (slot, (feature, value)) in out.iter_mut().zip(self.iter()) {
            *slot = (feature, value);
        }
        out
    }

    /// Unweighted Euclidean distance in raw units.
    #[must_use]
    pub fn euclidean_distance(&self, other: &Self) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// Check that every value is a finite number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonFiniteFeature`] naming the first offending feature.
    pub fn ensure_finite(&self) -> Result<()> {
        match self.iter().find(|(_, v)| !v.is_finite()) {
            Some((feature, value)) => Err(Error::NonFiniteFeature {
                feature: feature.name(),
                value,
            }),
            None => Ok(()),
        }
    }
}

impl From<[f64; FEATURE_COUNT]> for AudioFeatures {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

/// How feature vectors are scaled before distances are measured.
///
/// `Raw` keeps every feature in its own units, so tempo dominates the
/// distance. `MinMax` rescales each dimension to `[0, 1]` over the songs
/// being ranked, giving the six features equal weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureScaling {
    #[default]
    Raw,
    MinMax,
}

impl fmt::Display for FeatureScaling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => f.write_str("raw"),
            Self::MinMax => f.write_str("min-max"),
        }
    }
}

impl std::str::FromStr for FeatureScaling {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "min-max" | "minmax" => Ok(Self::MinMax),
            other => Err(Error::InvalidData(format!(
                "unknown feature scaling {other:?} (expected raw or min-max)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_order() {
        let names: Vec<_> = AudioFeature::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            [
                "acousticness",
                "danceability",
                "energy",
                "instrumentalness",
                "valence",
                "tempo"
            ]
        );
        for (i, feature) in AudioFeature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
    }

    #[test]
    fn test_default_target() {
        let target = AudioFeatures::default_target();
        assert_eq!(target.as_array(), &[0.1, 0.2, 0.3, 0.4, 0.2, 118.0]);
    }

    #[test]
    fn test_from_slice_wrong_dimension() {
        let err = AudioFeatures::from_slice(&[0.1, 0.2, 0.3]).unwrap_err();
        assert!(matches!(
            err,
            Error::FeatureDimension {
                expected: 6,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_from_slice_rejects_nan() {
        let err = AudioFeatures::from_slice(&[0.1, f64::NAN, 0.3, 0.4, 0.5, 120.0]).unwrap_err();
        assert!(matches!(
            err,
            Error::NonFiniteFeature {
                feature: "danceability",
                ..
            }
        ));
    }

    #[test]
    fn test_euclidean_distance() {
        let a = AudioFeatures::new([0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let b = AudioFeatures::new([0.0, 0.0, 0.0, 0.0, 3.0, 4.0]);
        assert!((a.euclidean_distance(&b) - 5.0).abs() < 1e-12);
        assert!(a.euclidean_distance(&a).abs() < f64::EPSILON);
    }

    #[test]
    fn test_profile_excludes_tempo() {
        let v = AudioFeatures::new([0.1, 0.2, 0.3, 0.4, 0.5, 120.0]);
        let profile = v.profile();
        assert_eq!(profile.len(), 5);
        assert_eq!(profile[4], (AudioFeature::Valence, 0.5));
    }

    #[test]
    fn test_scaling_parse() {
        assert_eq!("raw".parse::<FeatureScaling>().unwrap(), FeatureScaling::Raw);
        assert_eq!(
            "Min-Max".parse::<FeatureScaling>().unwrap(),
            FeatureScaling::MinMax
        );
        assert!("zscore".parse::<FeatureScaling>().is_err());
    }

    #[test]
    fn test_scaling_serde() {
        let json = serde_json::to_string(&FeatureScaling::MinMax).unwrap();
        assert_eq!(json, "\"min-max\"");
    }
}

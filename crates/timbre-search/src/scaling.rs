use timbre_core::model::{AudioFeatures, FeatureScaling, FEATURE_COUNT};

/// Affine per-dimension transform fitted to the songs of one query.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scaler {
    offset: [f64; FEATURE_COUNT],
    span: [f64; FEATURE_COUNT],
}

impl Scaler {
    pub(crate) fn fit<'a, I>(scaling: FeatureScaling, points: I) -> Self
    where
        I: IntoIterator<Item = &'a AudioFeatures>,
    {
        match scaling {
            FeatureScaling::Raw => Self {
                offset: [0.0; FEATURE_COUNT],
                span: [1.0; FEATURE_COUNT],
            },
            FeatureScaling::MinMax => {
                let mut min = [f64::INFINITY; FEATURE_COUNT];
                let mut max = [f64::NEG_INFINITY; FEATURE_COUNT];
                for point in points {
                    for (d, &value) in point.as_array().iter().enumerate() {
                        min[d] = min[d].min(value);
                        max[d] = max[d].max(value);
                    }
                }
                let mut span = [0.0; FEATURE_COUNT];
                for d in 0..FEATURE_COUNT {
                    // No points leaves min at +inf; treat as a flat dimension.
                    if min[d].is_finite() {
                        span[d] = max[d] - min[d];
                    } else {
                        min[d] = 0.0;
                    }
                }
                Self { offset: min, span }
            }
        }
    }

    /// Map a vector into the scaled space. Flat dimensions collapse to 0.
    pub(crate) fn apply(&self, features: &AudioFeatures) -> AudioFeatures {
        let raw = features.as_array();
        let mut out = [0.0; FEATURE_COUNT];
        for d in 0..FEATURE_COUNT {
            if self.span[d] > 0.0 {
                out[d] = (raw[d] - self.offset[d]) / self.span[d];
            }
        }
        AudioFeatures::new(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_is_identity() {
        let v = AudioFeatures::new([0.1, 0.2, 0.3, 0.4, 0.5, 120.0]);
        let scaler = Scaler::fit(FeatureScaling::Raw, [&v]);
        assert_eq!(scaler.apply(&v), v);
    }

    #[test]
    fn test_min_max_maps_to_unit_range() {
        let a = AudioFeatures::new([0.0, 0.2, 0.5, 0.0, 0.5, 60.0]);
        let b = AudioFeatures::new([1.0, 0.4, 0.5, 0.0, 1.0, 180.0]);
        let scaler = Scaler::fit(FeatureScaling::MinMax, [&a, &b]);

        assert_eq!(scaler.apply(&a).as_array(), &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(scaler.apply(&b).as_array(), &[1.0, 1.0, 0.0, 0.0, 1.0, 1.0]);

        let target = AudioFeatures::new([0.5, 0.3, 0.9, 0.3, 0.75, 120.0]);
        let scaled = scaler.apply(&target);
        assert!((scaled.as_array()[5] - 0.5).abs() < 1e-12);
        // Flat dimensions contribute nothing, whatever the target asks for.
        assert!(scaled.as_array()[2].abs() < f64::EPSILON);
        assert!(scaled.as_array()[3].abs() < f64::EPSILON);
    }
}

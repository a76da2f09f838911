pub mod features;
pub mod ids;
pub mod song;

pub use features::{AudioFeature, AudioFeatures, FeatureScaling, FEATURE_COUNT};
pub use ids::TrackUri;
pub use song::{CatalogRow, SongRecord};

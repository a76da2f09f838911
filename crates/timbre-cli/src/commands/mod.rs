pub mod browse;
pub mod config;
pub mod genres;
pub mod recommend;
pub mod stats;

pub use browse::run_browse;
pub use genres::list_genres;
pub use recommend::run_recommend;
pub use stats::show_stats;

use anyhow::{Context, Result};
use timbre_core::model::{AudioFeature, AudioFeatures, FeatureScaling};
use timbre_core::taxonomy::YearRange;
use timbre_core::CatalogIndex;
use timbre_ingest::{load_catalog, Config};
use timbre_search::{Query, RecommendOptions, Recommender};

/// Query parameters shared by `recommend` and `browse`.
#[derive(Debug, clap::Args)]
pub struct QueryArgs {
    /// Genre to recommend from (case-insensitive)
    #[arg(long, short, default_value = "Pop")]
    pub genre: String,

    /// First release year to include
    #[arg(long, default_value_t = YearRange::DEFAULT.start)]
    pub start_year: i32,

    /// Last release year to include
    #[arg(long, default_value_t = YearRange::DEFAULT.end)]
    pub end_year: i32,

    /// Target acousticness (0.0-1.0)
    #[arg(long, default_value_t = AudioFeature::Acousticness.default_target())]
    pub acousticness: f64,

    /// Target danceability (0.0-1.0)
    #[arg(long, default_value_t = AudioFeature::Danceability.default_target())]
    pub danceability: f64,

    /// Target energy (0.0-1.0)
    #[arg(long, default_value_t = AudioFeature::Energy.default_target())]
    pub energy: f64,

    /// Target instrumentalness (0.0-1.0)
    #[arg(long, default_value_t = AudioFeature::Instrumentalness.default_target())]
    pub instrumentalness: f64,

    /// Target valence (0.0-1.0)
    #[arg(long, default_value_t = AudioFeature::Valence.default_target())]
    pub valence: f64,

    /// Target tempo in BPM (0-244)
    #[arg(long, default_value_t = AudioFeature::Tempo.default_target())]
    pub tempo: f64,

    /// Feature scaling: raw or min-max (default: from config)
    #[arg(long)]
    pub scaling: Option<FeatureScaling>,
}

impl QueryArgs {
    pub fn target(&self) -> [f64; 6] {
        [
            self.acousticness,
            self.danceability,
            self.energy,
            self.instrumentalness,
            self.valence,
            self.tempo,
        ]
    }

    pub fn to_query(&self) -> Result<Query> {
        let target = AudioFeatures::from_slice(&self.target()).context("Invalid target features")?;
        Ok(Query::with_features(
            self.genre.clone(),
            YearRange::new(self.start_year, self.end_year),
            target,
        ))
    }
}

/// Load the catalog named by the configuration.
pub fn open_catalog(config: &Config) -> Result<CatalogIndex> {
    load_catalog(&config.catalog_path).with_context(|| {
        format!(
            "Failed to load catalog from {}\n\nSet catalog_path with 'timbre config set catalog_path <file>' or pass --catalog.",
            config.catalog_path.display()
        )
    })
}

/// Build a recommender over `catalog` using the configured genres, cap and
/// scaling. `scaling` overrides the configured scaling when given.
pub fn build_recommender<'a>(
    catalog: &'a CatalogIndex,
    config: &Config,
    scaling: Option<FeatureScaling>,
) -> Result<Recommender<'a>> {
    let options = RecommendOptions::new(
        config.popularity_cap,
        scaling.unwrap_or(config.feature_scaling),
    )?;
    Ok(Recommender::new(catalog)
        .with_genres(config.supported_genres())
        .with_options(options))
}

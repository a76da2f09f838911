//! Nearest-neighbour song retrieval for timbre.
//!
//! Answers a recommendation query by filtering the catalog to one genre and
//! release-year window, keeping the most popular matches, and ranking them
//! by distance to a target audio-feature vector with a k-d tree built for
//! that query alone.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod neighbors;
pub mod query;
pub mod retrieval;
mod scaling;
pub mod session;

pub use error::{QueryError, QueryResult};
pub use neighbors::NeighborIndex;
pub use query::Query;
pub use retrieval::{
    rank, select_candidates, RecommendOptions, Recommendation, Recommender,
    DEFAULT_POPULARITY_CAP, MAX_POPULARITY_CAP,
};
pub use session::BrowseSession;

pub mod genre;
pub mod period;

pub use genre::{parse_genre_list, Genre, SupportedGenres, DEFAULT_GENRES};
pub use period::YearRange;

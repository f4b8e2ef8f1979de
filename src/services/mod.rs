pub mod posters;
pub mod providers;
pub mod recommender;

pub use posters::PosterService;
pub use providers::{PosterProvider, TmdbProvider};
pub use recommender::{Recommender, MAX_RECOMMENDATIONS};

pub mod entry;
pub mod stars;
pub mod username;

pub use entry::{DiaryEntry, HistogramFrame, RatingItem};
pub use stars::{bin_index, stars_to_rating, STAR_BINS};
pub use username::Username;

//! Domain types

mod features;
mod ids;
mod track;

pub use features::AudioFeatures;
pub use ids::TrackId;
pub use track::Track;

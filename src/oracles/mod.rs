//! Collaborators the planner consumes: quota storage and place lookup.

pub mod google_places;
pub mod place;
pub mod quota;

pub use google_places::GooglePlacesOracle;
pub use place::{NoopPlaceOracle, PlaceCandidate, PlaceOracle};
pub use quota::{CallerQuota, InMemoryQuotaStore, QuotaOracle};

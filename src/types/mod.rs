pub mod request;
pub mod result;
pub mod tier;

pub use request::{CallerId, SimulationRequest};
pub use result::{Activity, DaySchedule, Enrichment, SimulationResult};
pub use tier::{ActivityTier, Category, FoodTier, LodgingTier, Tier, Tiers};

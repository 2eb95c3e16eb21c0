pub mod allocation;
pub mod config;
pub mod duration;
pub mod enrichment;
pub mod itinerary;
pub mod narrative;
pub mod planner;
pub mod quota;

pub use allocation::{allocate, Allocation};
pub use config::PlannerConfig;
pub use duration::{budget_per_day, plan_duration};
pub use enrichment::{apply_lookups, place_query, PlaceEnricher, PlaceQuery};
pub use itinerary::{build_schedule, TimeSlot};
pub use narrative::{compose_narrative, NarrativeContext};
pub use planner::TripPlanner;
pub use quota::{QuotaGate, QuotaToken, FREE_DAY_CAP, PREMIUM_DAY_CAP};

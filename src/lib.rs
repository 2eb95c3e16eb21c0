//! trip-budget-rs: budget-driven travel itinerary planning
//!
//! Given a destination, a total budget and a tier for lodging, food and
//! activities, the planner sizes the trip, splits each day's budget across
//! categories, lays out a six-slot daily schedule, optionally attaches real
//! places to each slot and writes a short summary. Free callers are limited
//! in trip length and number of simulations.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trip_budget_rs::{
//!     oracles::{GooglePlacesOracle, InMemoryQuotaStore},
//!     SimulationRequest, Tiers, TripPlanner,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let places = GooglePlacesOracle::from_env()?;
//!     let planner = TripPlanner::new(Arc::new(InMemoryQuotaStore::default()), Arc::new(places));
//!
//!     let request = SimulationRequest::new("alice", "Lisbon", 1200.0, Tiers::default());
//!     let result = planner.simulate(&request).await?;
//!     println!("{}", result.narrative);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod error;
pub mod oracles;
pub mod schemas;
pub(crate) mod services;
pub mod types;

pub use core::{Allocation, PlannerConfig, QuotaGate, TimeSlot, TripPlanner};
pub use error::{PlannerError, Result};
pub use schemas::RequestValidator;
pub use types::{
    Activity, ActivityTier, CallerId, Category, DaySchedule, Enrichment, FoodTier, LodgingTier,
    SimulationRequest, SimulationResult, Tier, Tiers,
};

#[cfg(feature = "cli")]
pub mod cli;

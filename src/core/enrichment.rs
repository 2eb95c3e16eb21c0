//! Attach real-world places to scheduled slots.
//!
//! Lookups never fail the plan: errors, timeouts and empty result lists all
//! leave the slot as it was.

use crate::{
    oracles::{PlaceCandidate, PlaceOracle},
    types::{Activity, ActivityTier, Category, DaySchedule, Enrichment, FoodTier, LodgingTier, Tiers},
};
use futures::stream::{self, StreamExt};
use rand::{Rng, RngCore};
use std::{sync::Arc, time::Duration};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Only the best few results are considered for variety
const TOP_CANDIDATES: usize = 3;

/// Search parameters for one (category, tier) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceQuery {
    pub query: &'static str,
    pub type_hint: &'static str,
}

impl PlaceQuery {
    const fn new(query: &'static str, type_hint: &'static str) -> Self {
        Self { query, type_hint }
    }
}

impl FoodTier {
    pub const fn place_query(self) -> PlaceQuery {
        match self {
            FoodTier::Basic => PlaceQuery::new("casual restaurant street food", "restaurant"),
            FoodTier::Varied => PlaceQuery::new("local restaurant traditional", "restaurant"),
            FoodTier::Gourmet => PlaceQuery::new("fine dining restaurant gourmet", "restaurant"),
        }
    }
}

impl LodgingTier {
    pub const fn place_query(self) -> PlaceQuery {
        match self {
            LodgingTier::Economy => PlaceQuery::new("hostel budget hotel", "lodging"),
            LodgingTier::Standard => PlaceQuery::new("3 star hotel", "lodging"),
            LodgingTier::Luxury => PlaceQuery::new("luxury hotel 4 star 5 star", "lodging"),
        }
    }
}

impl ActivityTier {
    pub const fn place_query(self) -> PlaceQuery {
        match self {
            ActivityTier::Discovery => {
                PlaceQuery::new("popular attraction landmark", "tourist_attraction")
            }
            ActivityTier::Cultural => PlaceQuery::new("museum cultural site", "museum"),
            ActivityTier::Adventure => {
                PlaceQuery::new("adventure activity outdoor", "amusement_park")
            }
        }
    }
}

/// Search parameters for a slot of `category` under the chosen tiers
pub fn place_query(category: Category, tiers: &Tiers) -> PlaceQuery {
    match category {
        Category::Food => tiers.food.place_query(),
        Category::Lodging => tiers.lodging.place_query(),
        Category::Activity => tiers.activity.place_query(),
    }
}

/// Pick one of the first candidates and fold it into the activity
pub fn apply_candidate(
    mut activity: Activity,
    candidates: &[PlaceCandidate],
    rng: &mut dyn RngCore,
) -> Activity {
    if candidates.is_empty() {
        return activity;
    }

    let window = candidates.len().min(TOP_CANDIDATES);
    let chosen = &candidates[rng.gen_range(0..window)];

    activity.description = format!("{} - {}", activity.description, chosen.name);
    activity.enrichment = Some(Enrichment {
        place_name: chosen.name.clone(),
        place_note: format!("{} (Rating: {:.1}/5)", chosen.description, chosen.rating),
        photo_ref: chosen.photo_ref.clone(),
    });

    activity
}

#[derive(Debug, Clone)]
pub struct PlaceEnricher {
    oracle: Arc<dyn PlaceOracle>,
    lookup_timeout: Duration,
    max_concurrent_lookups: usize,
}

impl PlaceEnricher {
    pub fn new(oracle: Arc<dyn PlaceOracle>) -> Self {
        Self {
            oracle,
            lookup_timeout: Duration::from_secs(5),
            max_concurrent_lookups: 6,
        }
    }

    pub fn with_lookup_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    pub fn with_max_concurrent_lookups(mut self, max_concurrent_lookups: usize) -> Self {
        self.max_concurrent_lookups = max_concurrent_lookups.max(1);
        self
    }

    /// Candidates for a query; any failure yields an empty list
    pub async fn lookup(&self, query: PlaceQuery, destination: &str) -> Vec<PlaceCandidate> {
        let search = self
            .oracle
            .search(query.query, query.type_hint, destination);

        match timeout(self.lookup_timeout, search).await {
            Ok(Ok(candidates)) => {
                debug!(
                    target: "tripbudget::enrichment",
                    oracle = self.oracle.name(),
                    query = query.query,
                    found = candidates.len(),
                    "place lookup"
                );
                candidates
            }
            Ok(Err(err)) => {
                warn!(
                    target: "tripbudget::enrichment",
                    oracle = self.oracle.name(),
                    query = query.query,
                    error = %err,
                    "place lookup failed, slot left unenriched"
                );
                Vec::new()
            }
            Err(_) => {
                warn!(
                    target: "tripbudget::enrichment",
                    oracle = self.oracle.name(),
                    query = query.query,
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "place lookup timed out, slot left unenriched"
                );
                Vec::new()
            }
        }
    }

    /// Enrich a single slot
    pub async fn enrich(
        &self,
        activity: Activity,
        tiers: &Tiers,
        destination: &str,
        rng: &mut (dyn RngCore + Send),
    ) -> Activity {
        let candidates = self
            .lookup(place_query(activity.category, tiers), destination)
            .await;
        apply_candidate(activity, &candidates, rng)
    }

    /// Look up candidates for every slot of a schedule, one list per slot in
    /// day then slot order. Lookups run concurrently.
    pub async fn lookup_schedule(
        &self,
        schedule: &[DaySchedule],
        tiers: &Tiers,
        destination: &str,
    ) -> Vec<Vec<PlaceCandidate>> {
        let queries: Vec<PlaceQuery> = schedule
            .iter()
            .flat_map(|day| day.slots.iter())
            .map(|slot| place_query(slot.category, tiers))
            .collect();

        stream::iter(queries)
            .map(|query| self.lookup(query, destination))
            .buffered(self.max_concurrent_lookups)
            .collect()
            .await
    }

    /// Enrich every slot of a schedule.
    ///
    /// Picks are drawn after all lookups complete, in slot order, so a seeded
    /// `rng` reproduces the same schedule.
    pub async fn enrich_schedule(
        &self,
        schedule: Vec<DaySchedule>,
        tiers: &Tiers,
        destination: &str,
        rng: &mut (dyn RngCore + Send),
    ) -> Vec<DaySchedule> {
        let lookups = self.lookup_schedule(&schedule, tiers, destination).await;
        apply_lookups(schedule, lookups, rng)
    }
}

/// Fold per-slot candidate lists (as returned by
/// [`PlaceEnricher::lookup_schedule`]) into the schedule
pub fn apply_lookups(
    schedule: Vec<DaySchedule>,
    lookups: Vec<Vec<PlaceCandidate>>,
    rng: &mut dyn RngCore,
) -> Vec<DaySchedule> {
    let mut lookups = lookups.into_iter();

    schedule
        .into_iter()
        .map(|mut day| {
            day.slots = day
                .slots
                .into_iter()
                .map(|slot| {
                    let candidates = lookups.next().unwrap_or_default();
                    apply_candidate(slot, &candidates, &mut *rng)
                })
                .collect();
            day
        })
        .collect()
}

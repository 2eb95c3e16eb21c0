//! Trip length from budget and tier choices.

use crate::types::{ActivityTier, FoodTier, LodgingTier, Tiers};
use tracing::debug;

impl LodgingTier {
    /// Estimated cost of one night
    pub const fn daily_base_cost(self) -> f64 {
        match self {
            LodgingTier::Economy => 30.0,
            LodgingTier::Standard => 80.0,
            LodgingTier::Luxury => 200.0,
        }
    }
}

impl FoodTier {
    /// Estimated cost of a day of meals
    pub const fn daily_base_cost(self) -> f64 {
        match self {
            FoodTier::Basic => 23.0,
            FoodTier::Varied => 55.0,
            FoodTier::Gourmet => 175.0,
        }
    }
}

impl ActivityTier {
    /// Estimated cost of a day of activities
    pub const fn daily_base_cost(self) -> f64 {
        match self {
            ActivityTier::Discovery => 0.0,
            ActivityTier::Cultural => 40.0,
            ActivityTier::Adventure => 125.0,
        }
    }
}

impl Tiers {
    /// Sum of the three base costs
    pub fn daily_cost(&self) -> f64 {
        self.lodging.daily_base_cost()
            + self.food.daily_base_cost()
            + self.activity.daily_base_cost()
    }
}

/// Number of days the trip should last.
///
/// An override is used as-is (within `1..=day_cap`). Otherwise the budget is
/// divided by the daily base cost and floored; a zero daily cost yields the cap.
pub fn plan_duration(budget: f64, tiers: &Tiers, day_cap: u32, day_override: Option<u32>) -> u32 {
    let cap = day_cap.max(1);

    if let Some(days) = day_override {
        let days = days.clamp(1, cap);
        debug!(target: "tripbudget::duration", requested = ?day_override, days, cap, "using day override");
        return days;
    }

    let daily_cost = tiers.daily_cost();
    if daily_cost <= 0.0 {
        return cap;
    }

    // float -> int casts saturate, NaN becomes 0
    let affordable = (budget / daily_cost).floor() as u32;
    let days = affordable.clamp(1, cap);

    debug!(
        target: "tripbudget::duration",
        budget,
        daily_cost,
        affordable,
        days,
        cap,
        "computed trip length"
    );

    days
}

/// Daily spend once the length is fixed. Keeps the slack left by the floor in
/// [`plan_duration`] instead of redistributing it.
pub fn budget_per_day(budget: f64, day_count: u32) -> f64 {
    budget / f64::from(day_count.max(1))
}

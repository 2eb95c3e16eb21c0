//! Fixed-shape daily schedule.

use super::allocation::Allocation;
use crate::types::{
    Activity, ActivityTier, Category, DaySchedule, FoodTier, LodgingTier, Tiers,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The six slots every day is made of, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    Breakfast,
    MorningActivity,
    Lunch,
    AfternoonActivity,
    Dinner,
    Lodging,
}

impl TimeSlot {
    pub const DAILY: [TimeSlot; 6] = [
        TimeSlot::Breakfast,
        TimeSlot::MorningActivity,
        TimeSlot::Lunch,
        TimeSlot::AfternoonActivity,
        TimeSlot::Dinner,
        TimeSlot::Lodging,
    ];

    pub const fn clock(self) -> &'static str {
        match self {
            TimeSlot::Breakfast => "08:00",
            TimeSlot::MorningActivity => "10:00",
            TimeSlot::Lunch => "13:00",
            TimeSlot::AfternoonActivity => "15:00",
            TimeSlot::Dinner => "20:00",
            TimeSlot::Lodging => "22:00",
        }
    }

    pub const fn category(self) -> Category {
        match self {
            TimeSlot::Breakfast | TimeSlot::Lunch | TimeSlot::Dinner => Category::Food,
            TimeSlot::MorningActivity | TimeSlot::AfternoonActivity => Category::Activity,
            TimeSlot::Lodging => Category::Lodging,
        }
    }

    /// Fraction of the day's category budget spent in this slot
    pub const fn share(self) -> f64 {
        match self {
            TimeSlot::Breakfast => 0.20,
            TimeSlot::Lunch => 0.35,
            TimeSlot::Dinner => 0.45,
            TimeSlot::MorningActivity | TimeSlot::AfternoonActivity => 0.50,
            TimeSlot::Lodging => 1.0,
        }
    }

    /// Base description for the slot given the traveller's tiers
    pub fn description(self, tiers: &Tiers) -> &'static str {
        match self {
            TimeSlot::Breakfast => match tiers.food {
                FoodTier::Basic => "Simple breakfast",
                FoodTier::Varied => "Breakfast at a café",
                FoodTier::Gourmet => "Gourmet brunch",
            },
            TimeSlot::MorningActivity => match tiers.activity {
                ActivityTier::Discovery => "Guided walking tour",
                ActivityTier::Cultural => "Cultural visit",
                ActivityTier::Adventure => "Excursion",
            },
            TimeSlot::Lunch => match tiers.food {
                FoodTier::Basic => "Local meal",
                FoodTier::Varied => "Traditional restaurant",
                FoodTier::Gourmet => "Gourmet restaurant",
            },
            TimeSlot::AfternoonActivity => match tiers.activity {
                ActivityTier::Discovery => "Local discovery",
                ActivityTier::Cultural => "Themed guided tour",
                ActivityTier::Adventure => "Adventure activity",
            },
            TimeSlot::Dinner => match tiers.food {
                FoodTier::Basic => "Simple dinner",
                FoodTier::Varied => "Local restaurant",
                FoodTier::Gourmet => "Fine dining dinner",
            },
            TimeSlot::Lodging => match tiers.lodging {
                LodgingTier::Economy => "Budget accommodation",
                LodgingTier::Standard => "Standard accommodation",
                LodgingTier::Luxury => "Luxury accommodation",
            },
        }
    }
}

/// Build `day_count` identical days of six costed slots each.
pub fn build_schedule(
    day_count: u32,
    budget_per_day: f64,
    allocation: &Allocation,
    tiers: &Tiers,
) -> Vec<DaySchedule> {
    let template: Vec<Activity> = TimeSlot::DAILY
        .iter()
        .map(|slot| {
            let category_budget = budget_per_day * allocation.share(slot.category());
            Activity::new(
                *slot,
                slot.description(tiers),
                category_budget * slot.share(),
            )
        })
        .collect();

    (1..=day_count)
        .map(|day_index| DaySchedule {
            day_index,
            day_budget: budget_per_day,
            slots: template.clone(),
        })
        .collect()
}

//! Budget split across lodging, food and activities.

use crate::types::{ActivityTier, Category, FoodTier, LodgingTier, Tiers};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

const SUM_TOLERANCE: f64 = 1e-9;

impl LodgingTier {
    pub const fn budget_weight(self) -> f64 {
        match self {
            LodgingTier::Economy => 0.40,
            LodgingTier::Standard => 0.45,
            LodgingTier::Luxury => 0.50,
        }
    }
}

impl FoodTier {
    pub const fn budget_weight(self) -> f64 {
        match self {
            FoodTier::Basic => 0.30,
            FoodTier::Varied => 0.32,
            FoodTier::Gourmet => 0.35,
        }
    }
}

impl ActivityTier {
    pub const fn budget_weight(self) -> f64 {
        match self {
            ActivityTier::Discovery => 0.15,
            ActivityTier::Cultural => 0.23,
            ActivityTier::Adventure => 0.30,
        }
    }
}

/// Fraction of each day's budget given to each category. Sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Allocation {
    pub lodging: f64,
    pub food: f64,
    pub activity: f64,
}

impl Allocation {
    pub fn share(&self, category: Category) -> f64 {
        match category {
            Category::Lodging => self.lodging,
            Category::Food => self.food,
            Category::Activity => self.activity,
        }
    }

    pub fn total(&self) -> f64 {
        Category::ALL.iter().map(|category| self.share(*category)).sum()
    }

    pub fn is_balanced(&self) -> bool {
        (self.total() - 1.0).abs() <= SUM_TOLERANCE
    }
}

/// Raw sum of the table weights for a tier combination
pub fn tier_weights_total(tiers: &Tiers) -> f64 {
    tiers.lodging.budget_weight() + tiers.food.budget_weight() + tiers.activity.budget_weight()
}

/// Map tiers to category fractions.
///
/// The weight table only sums to 1.0 along its middle row, so the three
/// weights are scaled by their total.
pub fn allocate(tiers: &Tiers) -> Allocation {
    let total = tier_weights_total(tiers);

    if (total - 1.0).abs() > SUM_TOLERANCE {
        debug!(
            target: "tripbudget::allocation",
            lodging = %tiers.lodging,
            food = %tiers.food,
            activity = %tiers.activity,
            weights_total = total,
            "normalising tier weights"
        );
    }

    Allocation {
        lodging: tiers.lodging.budget_weight() / total,
        food: tiers.food.budget_weight() / total,
        activity: tiers.activity.budget_weight() / total,
    }
}

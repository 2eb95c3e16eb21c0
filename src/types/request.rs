use super::tier::{ActivityTier, FoodTier, LodgingTier, Tiers};
use crate::error::{PlannerError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the caller whose quota a simulation is charged against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct CallerId(String);

impl CallerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CallerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A request to plan a trip.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    /// Caller whose free-simulation quota is charged
    pub caller_id: CallerId,
    /// Destination city, e.g. "Lisbon, Portugal"
    #[schemars(length(min = 1))]
    pub destination: String,
    /// Total trip budget, must be positive
    pub total_budget: f64,
    /// economy | standard | luxury
    #[schemars(with = "String")]
    pub lodging_tier: LodgingTier,
    /// basic | varied | gourmet
    #[schemars(with = "String")]
    pub food_tier: FoodTier,
    /// discovery | cultural | adventure
    #[schemars(with = "String")]
    pub activity_tier: ActivityTier,
    /// Explicit trip length; replaces the computed day count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_override: Option<u32>,
}

impl SimulationRequest {
    pub fn new(
        caller_id: impl Into<CallerId>,
        destination: impl Into<String>,
        total_budget: f64,
        tiers: Tiers,
    ) -> Self {
        Self {
            caller_id: caller_id.into(),
            destination: destination.into(),
            total_budget,
            lodging_tier: tiers.lodging,
            food_tier: tiers.food,
            activity_tier: tiers.activity,
            day_override: None,
        }
    }

    pub fn with_day_override(mut self, days: u32) -> Self {
        self.day_override = Some(days);
        self
    }

    pub fn tiers(&self) -> Tiers {
        Tiers::new(self.lodging_tier, self.food_tier, self.activity_tier)
    }

    /// Reject requests that cannot be planned
    pub fn validate(&self) -> Result<()> {
        if self.caller_id.as_str().trim().is_empty() {
            return Err(PlannerError::Validation(
                "callerId must not be empty".to_string(),
            ));
        }

        if self.destination.trim().is_empty() {
            return Err(PlannerError::Validation(
                "destination must not be empty".to_string(),
            ));
        }

        if !self.total_budget.is_finite() || self.total_budget <= 0.0 {
            return Err(PlannerError::Validation(format!(
                "totalBudget must be a positive amount, got {}",
                self.total_budget
            )));
        }

        if self.day_override == Some(0) {
            return Err(PlannerError::Validation(
                "dayOverride must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

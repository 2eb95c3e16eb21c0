use super::tier::Category;
use crate::{
    core::{allocation::Allocation, itinerary::TimeSlot},
    error::Result,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Real-world place attached to a scheduled slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Enrichment {
    pub place_name: String,
    /// Address or short description followed by the rating
    pub place_note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_ref: Option<String>,
}

/// One costed slot of a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub slot: TimeSlot,
    /// Clock label, e.g. "08:00"
    pub time_of_day: String,
    pub category: Category,
    pub description: String,
    pub estimated_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Enrichment>,
}

impl Activity {
    pub fn new(slot: TimeSlot, description: impl Into<String>, estimated_cost: f64) -> Self {
        Self {
            slot,
            time_of_day: slot.clock().to_string(),
            category: slot.category(),
            description: description.into(),
            estimated_cost,
            enrichment: None,
        }
    }

    pub fn is_enriched(&self) -> bool {
        self.enrichment.is_some()
    }
}

/// Schedule for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    /// 1-based day counter
    pub day_index: u32,
    pub day_budget: f64,
    pub slots: Vec<Activity>,
}

impl DaySchedule {
    /// Sum of the slot estimates
    pub fn planned_spend(&self) -> f64 {
        self.slots.iter().map(|slot| slot.estimated_cost).sum()
    }
}

/// Outcome of a trip simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub day_count: u32,
    pub budget_per_day: f64,
    pub allocation: Allocation,
    pub schedule: Vec<DaySchedule>,
    pub narrative: String,
    pub is_premium: bool,
    /// Free simulations left after this one, -1 for premium callers
    pub uses_remaining: i64,
}

impl SimulationResult {
    /// Number of slots that received a place suggestion
    pub fn enriched_slot_count(&self) -> usize {
        self.schedule
            .iter()
            .flat_map(|day| day.slots.iter())
            .filter(|slot| slot.is_enriched())
            .count()
    }

    /// Pretty JSON in the camelCase wire format
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Plain-text day-by-day rendering of the schedule
    pub fn itinerary_table(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "=== {} day(s) at {:.2}/day ===",
            self.day_count, self.budget_per_day
        ));
        lines.push(format!(
            "Allocation: lodging {:.0}% | food {:.0}% | activity {:.0}%",
            self.allocation.lodging * 100.0,
            self.allocation.food * 100.0,
            self.allocation.activity * 100.0
        ));

        for day in &self.schedule {
            lines.push(String::new());
            lines.push(format!("--- Day {} ({:.2}) ---", day.day_index, day.day_budget));
            for slot in &day.slots {
                lines.push(format!(
                    "{}  {:<8} {:>9.2}  {}",
                    slot.time_of_day, slot.category, slot.estimated_cost, slot.description
                ));
                if let Some(enrichment) = &slot.enrichment {
                    lines.push(format!("{:>21}{}", "", enrichment.place_note));
                }
            }
        }

        if self.uses_remaining >= 0 {
            lines.push(String::new());
            lines.push(format!("Free simulations remaining: {}", self.uses_remaining));
        }

        lines.join("\n")
    }
}

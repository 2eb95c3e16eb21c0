//! JSON Schema for incoming requests and the validators built on it.

pub mod validation;
pub mod validator;

use crate::types::SimulationRequest;
use serde_json::Value;
use std::sync::OnceLock;

pub use validator::RequestValidator;

pub const REQUEST_SCHEMA_NAME: &str = "SimulationRequest";

/// Cached JSON Schema of [`SimulationRequest`]
pub fn request_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let root = schemars::schema_for!(SimulationRequest);
        serde_json::to_value(root).unwrap_or_else(|err| {
            panic!("failed to serialize schema for {}: {}", REQUEST_SCHEMA_NAME, err)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_required_fields() {
        let schema = request_schema();
        assert_eq!(schema["type"], "object");

        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|value| value.as_str())
            .collect();

        for field in [
            "callerId",
            "destination",
            "totalBudget",
            "lodgingTier",
            "foodTier",
            "activityTier",
        ] {
            assert!(required.contains(&field), "{field} should be required");
        }
        assert!(!required.contains(&"dayOverride"));
    }

    #[test]
    fn test_tiers_are_free_strings() {
        let props = &request_schema()["properties"];
        assert_eq!(props["lodgingTier"]["type"], "string");
        assert!(props["lodgingTier"].get("enum").is_none());
    }
}

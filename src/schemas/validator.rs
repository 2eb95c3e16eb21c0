use super::{request_schema, validation::validate_against_schema, REQUEST_SCHEMA_NAME};
use crate::{
    error::{PlannerError, Result},
    types::SimulationRequest,
};
use serde_json::Value;

/// Validation strategies for incoming simulation requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestValidator {
    /// Fast validation using serde only
    SerdeFirst,
    /// JSON Schema check before deserializing
    #[default]
    Strict,
}

impl RequestValidator {
    /// Validate and deserialize a JSON value into a request
    pub fn parse(&self, payload: Value) -> Result<SimulationRequest> {
        if *self == RequestValidator::Strict {
            validate_against_schema(REQUEST_SCHEMA_NAME, request_schema(), &payload)?;
        }

        let request: SimulationRequest = serde_path_to_error::deserialize(payload).map_err(|e| {
            let path = e.path().to_string();
            let location = if path.is_empty() || path == "." {
                "<root>".to_string()
            } else {
                path
            };
            PlannerError::Validation(format!(
                "Request validation failed at {}: {}",
                location,
                e.inner()
            ))
        })?;

        request.validate()?;
        Ok(request)
    }

    /// Parse raw JSON text
    pub fn parse_str(&self, raw: &str) -> Result<SimulationRequest> {
        let payload: Value = serde_json::from_str(raw)
            .map_err(|err| PlannerError::Validation(format!("Malformed request JSON: {err}")))?;
        self.parse(payload)
    }
}

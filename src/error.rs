use thiserror::Error;

/// Main error type for the planning engine
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Free simulation quota exhausted for caller {caller}")]
    QuotaExceeded { caller: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Place lookup error: {0}")]
    PlaceLookup(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Rate limit exceeded: retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

const GENERIC_FAILURE_MESSAGE: &str = "The simulation could not be completed. No quota was used.";

impl PlannerError {
    /// Errors the caller can act on (top up their plan, fix the request)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PlannerError::QuotaExceeded { .. } | PlannerError::Validation(_)
        )
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PlannerError::RateLimit { .. } | PlannerError::Timeout(_)
        )
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            PlannerError::Validation(_) => "VALIDATION_ERROR",
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::PlaceLookup(_) => "PLACE_LOOKUP_ERROR",
            PlannerError::Timeout(_) => "TIMEOUT_ERROR",
            PlannerError::RateLimit { .. } => "RATE_LIMIT_ERROR",
            PlannerError::Serialization(_) => "SERIALIZATION_ERROR",
            PlannerError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status a transport layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            PlannerError::QuotaExceeded { .. } => 402,
            PlannerError::Validation(_) => 400,
            _ => 500,
        }
    }

    /// Message safe to show to the caller. Internal failures are not detailed.
    pub fn client_message(&self) -> String {
        match self {
            PlannerError::QuotaExceeded { .. } => {
                "You have used all free simulations. Upgrade to premium for unlimited simulations."
                    .to_string()
            }
            PlannerError::Validation(_) => self.to_string(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        let code = if self.is_client_error() {
            self.error_code()
        } else {
            "INTERNAL_ERROR"
        };

        serde_json::json!({
            "error": {
                "code": code,
                "status": self.status_code(),
                "message": self.client_message(),
                "retryable": self.is_retryable()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        let quota = PlannerError::QuotaExceeded {
            caller: "alice".to_string(),
        };
        assert!(quota.is_client_error());
        assert_eq!(quota.status_code(), 402);
        assert_eq!(quota.error_code(), "QUOTA_EXCEEDED");

        let validation = PlannerError::Validation("destination must not be empty".to_string());
        assert!(validation.is_client_error());
        assert_eq!(validation.status_code(), 400);
        assert!(validation.client_message().contains("destination"));
    }

    #[test]
    fn test_internal_payload_is_generic() {
        let error = PlannerError::Internal("daily cost table is empty".to_string());
        let payload = error.to_error_payload();

        assert_eq!(payload["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(payload["error"]["status"], 500);
        assert!(!payload["error"]["message"]
            .as_str()
            .unwrap()
            .contains("daily cost"));
    }

    #[test]
    fn test_retryable() {
        assert!(PlannerError::RateLimit { retry_after: 2 }.is_retryable());
        assert!(PlannerError::Timeout("lookup".to_string()).is_retryable());
        assert!(!PlannerError::Validation("x".to_string()).is_retryable());
    }
}

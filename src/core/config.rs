use super::quota::{FREE_DAY_CAP, PREMIUM_DAY_CAP};
use crate::error::{PlannerError, Result};
use std::{str::FromStr, time::Duration};

/// Tunables of the planning pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub premium_day_cap: u32,
    pub free_day_cap: u32,
    /// Per place lookup
    pub lookup_timeout: Duration,
    /// Whole simulation, enrichment included
    pub request_timeout: Duration,
    pub max_concurrent_lookups: usize,
    /// Skip place lookups entirely when false
    pub enrich: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            premium_day_cap: PREMIUM_DAY_CAP,
            free_day_cap: FREE_DAY_CAP,
            lookup_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(60),
            max_concurrent_lookups: 6,
            enrich: true,
        }
    }
}

impl PlannerConfig {
    pub fn with_day_caps(mut self, premium_day_cap: u32, free_day_cap: u32) -> Self {
        self.premium_day_cap = premium_day_cap;
        self.free_day_cap = free_day_cap;
        self
    }

    pub fn with_lookup_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_max_concurrent_lookups(mut self, max_concurrent_lookups: usize) -> Self {
        self.max_concurrent_lookups = max_concurrent_lookups;
        self
    }

    pub fn with_enrichment(mut self, enrich: bool) -> Self {
        self.enrich = enrich;
        self
    }

    /// Defaults overridden by `TRIP_*` environment variables:
    /// `TRIP_PREMIUM_DAY_CAP`, `TRIP_FREE_DAY_CAP`, `TRIP_LOOKUP_TIMEOUT_SECS`,
    /// `TRIP_REQUEST_TIMEOUT_SECS`, `TRIP_MAX_CONCURRENT_LOOKUPS`, `TRIP_ENRICH`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(cap) = env_parse("TRIP_PREMIUM_DAY_CAP")? {
            config.premium_day_cap = cap;
        }
        if let Some(cap) = env_parse("TRIP_FREE_DAY_CAP")? {
            config.free_day_cap = cap;
        }
        if let Some(secs) = env_parse("TRIP_LOOKUP_TIMEOUT_SECS")? {
            config.lookup_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parse("TRIP_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(max) = env_parse("TRIP_MAX_CONCURRENT_LOOKUPS")? {
            config.max_concurrent_lookups = max;
        }
        if let Some(enrich) = env_parse("TRIP_ENRICH")? {
            config.enrich = enrich;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.premium_day_cap == 0 || self.free_day_cap == 0 {
            return Err(PlannerError::Config(
                "day caps must be at least 1".to_string(),
            ));
        }
        if self.max_concurrent_lookups == 0 {
            return Err(PlannerError::Config(
                "max_concurrent_lookups must be at least 1".to_string(),
            ));
        }
        if self.lookup_timeout.is_zero() || self.request_timeout.is_zero() {
            return Err(PlannerError::Config("timeouts must be non-zero".to_string()));
        }
        Ok(())
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|err| PlannerError::Config(format!("Invalid {key}={raw}: {err}"))),
        Err(_) => Ok(None),
    }
}

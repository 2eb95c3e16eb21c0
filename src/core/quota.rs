//! Admission control: who may simulate, for how many days, and the single
//! quota decrement per accepted simulation.

use crate::{
    error::{PlannerError, Result},
    oracles::{CallerQuota, QuotaOracle},
    types::CallerId,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const PREMIUM_DAY_CAP: u32 = 30;
pub const FREE_DAY_CAP: u32 = 5;

/// Permission to run one simulation. Must be committed or rejected.
#[must_use = "a quota token must be committed or rejected"]
#[derive(Debug)]
pub struct QuotaToken {
    caller: CallerId,
    is_premium: bool,
    day_cap: u32,
    remaining_before: i64,
}

impl QuotaToken {
    pub fn caller(&self) -> &CallerId {
        &self.caller
    }

    pub fn is_premium(&self) -> bool {
        self.is_premium
    }

    pub fn day_cap(&self) -> u32 {
        self.day_cap
    }

    /// Free uses observed at authorization time
    pub fn remaining_before(&self) -> i64 {
        self.remaining_before
    }
}

#[derive(Debug, Clone)]
pub struct QuotaGate {
    oracle: Arc<dyn QuotaOracle>,
    premium_day_cap: u32,
    free_day_cap: u32,
}

impl QuotaGate {
    pub fn new(oracle: Arc<dyn QuotaOracle>) -> Self {
        Self {
            oracle,
            premium_day_cap: PREMIUM_DAY_CAP,
            free_day_cap: FREE_DAY_CAP,
        }
    }

    pub fn with_day_caps(mut self, premium_day_cap: u32, free_day_cap: u32) -> Self {
        self.premium_day_cap = premium_day_cap;
        self.free_day_cap = free_day_cap;
        self
    }

    pub fn premium_day_cap(&self) -> u32 {
        self.premium_day_cap
    }

    pub fn free_day_cap(&self) -> u32 {
        self.free_day_cap
    }

    /// Decide whether `caller` may simulate. Nothing is consumed yet.
    pub async fn authorize(&self, caller: &CallerId) -> Result<QuotaToken> {
        let CallerQuota {
            is_premium,
            free_uses_remaining,
        } = self.oracle.authorize(caller).await?;

        if !is_premium && free_uses_remaining <= 0 {
            info!(target: "tripbudget::quota", %caller, "free quota exhausted");
            return Err(PlannerError::QuotaExceeded {
                caller: caller.to_string(),
            });
        }

        let day_cap = if is_premium {
            self.premium_day_cap
        } else {
            self.free_day_cap
        };

        debug!(
            target: "tripbudget::quota",
            %caller,
            is_premium,
            free_uses_remaining,
            day_cap,
            "caller authorized"
        );

        Ok(QuotaToken {
            caller: caller.clone(),
            is_premium,
            day_cap,
            remaining_before: free_uses_remaining,
        })
    }

    /// Charge the use once the simulation succeeded. Returns the uses left
    /// (-1 for premium callers).
    pub async fn commit(&self, token: QuotaToken) -> Result<i64> {
        if token.is_premium {
            return Ok(CallerQuota::UNLIMITED);
        }

        match self.oracle.decrement_if_positive(&token.caller).await? {
            Some(remaining) => {
                debug!(target: "tripbudget::quota", caller = %token.caller, remaining, "quota committed");
                Ok(remaining)
            }
            None => {
                // another request from the same caller used the last free simulation first
                warn!(target: "tripbudget::quota", caller = %token.caller, "quota exhausted at commit");
                Err(PlannerError::QuotaExceeded {
                    caller: token.caller.to_string(),
                })
            }
        }
    }

    /// Release a token whose simulation failed. Nothing was reserved, so the
    /// caller keeps their quota.
    pub fn reject(&self, token: QuotaToken) {
        debug!(target: "tripbudget::quota", caller = %token.caller, "simulation failed, quota untouched");
    }
}

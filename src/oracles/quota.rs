use crate::{error::Result, types::CallerId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// Subscription state of a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerQuota {
    pub is_premium: bool,
    /// Free simulations left, [`CallerQuota::UNLIMITED`] for premium callers
    pub free_uses_remaining: i64,
}

impl CallerQuota {
    pub const UNLIMITED: i64 = -1;

    pub fn premium() -> Self {
        Self {
            is_premium: true,
            free_uses_remaining: Self::UNLIMITED,
        }
    }

    pub fn free(uses: i64) -> Self {
        Self {
            is_premium: false,
            free_uses_remaining: uses,
        }
    }
}

/// Identity/quota collaborator
#[async_trait]
pub trait QuotaOracle: Send + Sync + std::fmt::Debug {
    /// Current quota of `caller`
    async fn authorize(&self, caller: &CallerId) -> Result<CallerQuota>;

    /// Atomically take one free use if any remain.
    ///
    /// Returns the remaining count after the decrement, or `None` when the
    /// caller had nothing left. Premium callers are never decremented.
    async fn decrement_if_positive(&self, caller: &CallerId) -> Result<Option<i64>>;
}

/// Process-local quota store.
///
/// Callers not seen before are registered with `default_free_uses`.
#[derive(Debug)]
pub struct InMemoryQuotaStore {
    accounts: Mutex<HashMap<CallerId, CallerQuota>>,
    default_free_uses: i64,
}

impl InMemoryQuotaStore {
    pub fn new(default_free_uses: i64) -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            default_free_uses,
        }
    }

    /// Seed an account before the store is shared
    pub fn with_account(mut self, caller: impl Into<CallerId>, quota: CallerQuota) -> Self {
        self.accounts.get_mut().insert(caller.into(), quota);
        self
    }

    pub async fn set_quota(&self, caller: impl Into<CallerId>, quota: CallerQuota) {
        self.accounts.lock().await.insert(caller.into(), quota);
    }

    /// Snapshot of a caller's quota, if registered
    pub async fn quota(&self, caller: &CallerId) -> Option<CallerQuota> {
        self.accounts.lock().await.get(caller).copied()
    }
}

impl Default for InMemoryQuotaStore {
    fn default() -> Self {
        Self::new(3)
    }
}

#[async_trait]
impl QuotaOracle for InMemoryQuotaStore {
    async fn authorize(&self, caller: &CallerId) -> Result<CallerQuota> {
        let mut accounts = self.accounts.lock().await;
        let quota = *accounts.entry(caller.clone()).or_insert_with(|| {
            debug!(target: "tripbudget::quota", %caller, uses = self.default_free_uses, "registering new caller");
            CallerQuota::free(self.default_free_uses)
        });
        Ok(quota)
    }

    async fn decrement_if_positive(&self, caller: &CallerId) -> Result<Option<i64>> {
        let mut accounts = self.accounts.lock().await;
        let quota = accounts
            .entry(caller.clone())
            .or_insert_with(|| CallerQuota::free(self.default_free_uses));

        if quota.is_premium {
            return Ok(Some(CallerQuota::UNLIMITED));
        }

        if quota.free_uses_remaining > 0 {
            quota.free_uses_remaining -= 1;
            Ok(Some(quota.free_uses_remaining))
        } else {
            Ok(None)
        }
    }
}

use super::{
    allocation::allocate,
    config::PlannerConfig,
    duration::{budget_per_day, plan_duration},
    enrichment::{apply_lookups, PlaceEnricher},
    itinerary::build_schedule,
    narrative::{compose_narrative, NarrativeContext},
    quota::{QuotaGate, QuotaToken},
};
use crate::{
    error::{PlannerError, Result},
    oracles::{PlaceOracle, QuotaOracle},
    schemas::RequestValidator,
    types::{SimulationRequest, SimulationResult},
};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Runs simulations end to end: admission, planning, enrichment and the
/// quota charge on success.
pub struct TripPlanner {
    quota_gate: QuotaGate,
    enricher: PlaceEnricher,
    config: PlannerConfig,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl fmt::Debug for TripPlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripPlanner")
            .field("quota_gate", &self.quota_gate)
            .field("enricher", &self.enricher)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TripPlanner {
    pub fn new(quota_oracle: Arc<dyn QuotaOracle>, place_oracle: Arc<dyn PlaceOracle>) -> Self {
        let config = PlannerConfig::default();
        Self {
            quota_gate: QuotaGate::new(quota_oracle)
                .with_day_caps(config.premium_day_cap, config.free_day_cap),
            enricher: PlaceEnricher::new(place_oracle)
                .with_lookup_timeout(config.lookup_timeout)
                .with_max_concurrent_lookups(config.max_concurrent_lookups),
            config,
            rng: Mutex::new(Box::new(StdRng::from_entropy())),
        }
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.quota_gate = self
            .quota_gate
            .with_day_caps(config.premium_day_cap, config.free_day_cap);
        self.enricher = self
            .enricher
            .with_lookup_timeout(config.lookup_timeout)
            .with_max_concurrent_lookups(config.max_concurrent_lookups);
        self.config = config;
        self
    }

    /// Source of randomness for place picks
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Parse, validate and simulate a raw JSON request
    pub async fn simulate_json(&self, raw: &str) -> Result<SimulationResult> {
        let request = RequestValidator::default().parse_str(raw)?;
        self.simulate(&request).await
    }

    /// Run one simulation. The caller's free quota is charged exactly once,
    /// and only when a full result is produced.
    pub async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult> {
        request.validate()?;
        let token = self.quota_gate.authorize(&request.caller_id).await?;

        let outcome = tokio::time::timeout(
            self.config.request_timeout,
            self.run_pipeline(request, &token),
        )
        .await
        .unwrap_or_else(|_| {
            Err(PlannerError::Timeout(format!(
                "simulation exceeded {}s",
                self.config.request_timeout.as_secs_f64()
            )))
        });

        match outcome {
            Ok(mut result) => {
                result.uses_remaining = self.quota_gate.commit(token).await?;
                info!(
                    target: "tripbudget::planner",
                    caller = %request.caller_id,
                    destination = %request.destination,
                    day_count = result.day_count,
                    uses_remaining = result.uses_remaining,
                    "simulation completed"
                );
                Ok(result)
            }
            Err(err) => {
                warn!(
                    target: "tripbudget::planner",
                    caller = %request.caller_id,
                    error = %err,
                    "simulation failed"
                );
                self.quota_gate.reject(token);
                Err(err)
            }
        }
    }

    async fn run_pipeline(
        &self,
        request: &SimulationRequest,
        token: &QuotaToken,
    ) -> Result<SimulationResult> {
        let tiers = request.tiers();
        let day_count = plan_duration(
            request.total_budget,
            &tiers,
            token.day_cap(),
            request.day_override,
        );

        let per_day = budget_per_day(request.total_budget, day_count);
        if !per_day.is_finite() {
            return Err(PlannerError::Internal(format!(
                "budget per day is not a number for {} day(s)",
                day_count
            )));
        }

        let allocation = allocate(&tiers);
        if !allocation.is_balanced() {
            return Err(PlannerError::Internal(format!(
                "allocation sums to {} instead of 1",
                allocation.total()
            )));
        }

        debug!(
            target: "tripbudget::planner",
            day_count,
            budget_per_day = per_day,
            lodging = allocation.lodging,
            food = allocation.food,
            activity = allocation.activity,
            "plan sized"
        );

        let mut schedule = build_schedule(day_count, per_day, &allocation, &tiers);

        if self.config.enrich {
            let lookups = self
                .enricher
                .lookup_schedule(&schedule, &tiers, &request.destination)
                .await;
            // held for the picks only, never across a lookup
            let mut rng = self.rng.lock().await;
            schedule = apply_lookups(schedule, lookups, &mut **rng);
        }

        let narrative = compose_narrative(&NarrativeContext {
            destination: &request.destination,
            total_budget: request.total_budget,
            day_count,
            budget_per_day: per_day,
            tiers,
            is_premium: token.is_premium(),
            premium_day_cap: self.quota_gate.premium_day_cap(),
        });

        Ok(SimulationResult {
            day_count,
            budget_per_day: per_day,
            allocation,
            schedule,
            narrative,
            is_premium: token.is_premium(),
            uses_remaining: token.remaining_before(),
        })
    }
}

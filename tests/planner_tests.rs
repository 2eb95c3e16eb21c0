use async_trait::async_trait;
use serde_json::json;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;
use trip_budget_rs::{
    core::allocation::allocate,
    oracles::{CallerQuota, InMemoryQuotaStore, NoopPlaceOracle, PlaceCandidate, PlaceOracle},
    ActivityTier, CallerId, Category, FoodTier, LodgingTier, PlannerConfig, PlannerError,
    SimulationRequest, Tiers, TimeSlot, TripPlanner,
};

/// Returns five candidates named after the query; even ranks carry a photo
#[derive(Debug, Default)]
struct StubPlaces {
    calls: AtomicUsize,
}

#[async_trait]
impl PlaceOracle for StubPlaces {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn search(
        &self,
        query: &str,
        _type_hint: &str,
        destination: &str,
    ) -> trip_budget_rs::Result<Vec<PlaceCandidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((0..5)
            .map(|idx| {
                let place =
                    PlaceCandidate::new(format!("{query} #{idx}"), format!("{destination} {idx}"), 4.0);
                if idx % 2 == 0 {
                    place.with_photo_ref(format!("photo-{idx}"))
                } else {
                    place
                }
            })
            .collect())
    }
}

#[derive(Debug)]
struct FailingPlaces;

#[async_trait]
impl PlaceOracle for FailingPlaces {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn search(&self, _: &str, _: &str, _: &str) -> trip_budget_rs::Result<Vec<PlaceCandidate>> {
        Err(PlannerError::PlaceLookup("service down".to_string()))
    }
}

#[derive(Debug)]
struct SlowPlaces;

#[async_trait]
impl PlaceOracle for SlowPlaces {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn search(&self, _: &str, _: &str, _: &str) -> trip_budget_rs::Result<Vec<PlaceCandidate>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }
}

/// Every lookup takes a fixed time before answering
#[derive(Debug)]
struct PausedPlaces(Duration);

#[async_trait]
impl PlaceOracle for PausedPlaces {
    fn name(&self) -> &'static str {
        "paused"
    }

    async fn search(&self, query: &str, _: &str, _: &str) -> trip_budget_rs::Result<Vec<PlaceCandidate>> {
        tokio::time::sleep(self.0).await;
        Ok(vec![PlaceCandidate::new(query, "somewhere", 3.5)])
    }
}

fn store_with(caller: &str, quota: CallerQuota) -> Arc<InMemoryQuotaStore> {
    Arc::new(InMemoryQuotaStore::new(0).with_account(caller, quota))
}

fn mid_request(caller: &str, budget: f64) -> SimulationRequest {
    SimulationRequest::new(caller, "Lisbon", budget, Tiers::default())
}

#[tokio::test]
async fn test_standard_trip_is_five_days() {
    let planner = TripPlanner::new(store_with("ana", CallerQuota::free(3)), Arc::new(NoopPlaceOracle));
    let result = planner.simulate(&mid_request("ana", 1000.0)).await.unwrap();

    assert_eq!(result.day_count, 5);
    assert_eq!(result.budget_per_day, 200.0);
    assert_eq!(result.uses_remaining, 2);
}

#[tokio::test]
async fn test_premium_luxury_trip_is_ten_days() {
    let planner = TripPlanner::new(store_with("pam", CallerQuota::premium()), Arc::new(NoopPlaceOracle));
    let tiers = Tiers::new(LodgingTier::Luxury, FoodTier::Gourmet, ActivityTier::Adventure);
    let request = SimulationRequest::new("pam", "Tokyo", 5000.0, tiers);

    let result = planner.simulate(&request).await.unwrap();
    assert_eq!(result.day_count, 10);
    assert_eq!(result.budget_per_day, 500.0);
    assert!(result.is_premium);
    assert_eq!(result.uses_remaining, -1);
}

#[tokio::test]
async fn test_day_cap_wins_over_override() {
    let planner = TripPlanner::new(store_with("fay", CallerQuota::free(3)), Arc::new(NoopPlaceOracle));
    let request = mid_request("fay", 10_000.0).with_day_override(20);

    let result = planner.simulate(&request).await.unwrap();
    assert_eq!(result.day_count, 5);
    assert_eq!(result.budget_per_day, 2000.0);
}

#[tokio::test]
async fn test_override_below_cap_is_used() {
    let planner = TripPlanner::new(store_with("pam", CallerQuota::premium()), Arc::new(NoopPlaceOracle));
    let request = mid_request("pam", 1000.0).with_day_override(8);

    let result = planner.simulate(&request).await.unwrap();
    assert_eq!(result.day_count, 8);
    assert_eq!(result.budget_per_day, 125.0);
}

#[tokio::test]
async fn test_exhausted_quota_produces_nothing() {
    let store = store_with("hal", CallerQuota::free(0));
    let places = Arc::new(StubPlaces::default());
    let planner = TripPlanner::new(store.clone(), places.clone());

    let err = planner.simulate(&mid_request("hal", 1000.0)).await.unwrap_err();

    assert!(matches!(err, PlannerError::QuotaExceeded { .. }));
    assert_eq!(err.status_code(), 402);
    assert_eq!(places.calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        store.quota(&CallerId::new("hal")).await,
        Some(CallerQuota::free(0))
    );
}

#[tokio::test]
async fn test_quota_runs_out_after_free_uses() {
    let store = store_with("gus", CallerQuota::free(2));
    let planner = TripPlanner::new(store, Arc::new(NoopPlaceOracle));
    let request = mid_request("gus", 500.0);

    assert_eq!(planner.simulate(&request).await.unwrap().uses_remaining, 1);
    assert_eq!(planner.simulate(&request).await.unwrap().uses_remaining, 0);
    assert!(matches!(
        planner.simulate(&request).await,
        Err(PlannerError::QuotaExceeded { .. })
    ));
}

#[tokio::test]
async fn test_every_day_has_six_ordered_slots() {
    let planner = TripPlanner::new(store_with("pam", CallerQuota::premium()), Arc::new(NoopPlaceOracle));
    let result = planner.simulate(&mid_request("pam", 3000.0)).await.unwrap();

    let expected = [
        ("08:00", Category::Food),
        ("10:00", Category::Activity),
        ("13:00", Category::Food),
        ("15:00", Category::Activity),
        ("20:00", Category::Food),
        ("22:00", Category::Lodging),
    ];

    for (idx, day) in result.schedule.iter().enumerate() {
        assert_eq!(day.day_index as usize, idx + 1);
        assert_eq!(day.slots.len(), 6);
        for (slot, (clock, category)) in day.slots.iter().zip(expected) {
            assert_eq!(slot.time_of_day, clock);
            assert_eq!(slot.category, category);
        }
        assert!(day.planned_spend() <= day.day_budget + 1e-9);
    }
}

#[test]
fn test_allocation_balanced_for_every_tier_combination() {
    for tiers in Tiers::all() {
        let allocation = allocate(&tiers);
        assert!(
            (allocation.total() - 1.0).abs() < 1e-9,
            "{tiers:?} sums to {}",
            allocation.total()
        );
    }
}

#[tokio::test]
async fn test_failing_places_leave_schedule_untouched() {
    let baseline = TripPlanner::new(store_with("ana", CallerQuota::premium()), Arc::new(NoopPlaceOracle))
        .simulate(&mid_request("ana", 1000.0))
        .await
        .unwrap();

    let store = store_with("ana", CallerQuota::free(1));
    let failing = TripPlanner::new(store.clone(), Arc::new(FailingPlaces))
        .simulate(&mid_request("ana", 1000.0))
        .await
        .unwrap();

    assert_eq!(failing.schedule, baseline.schedule);
    assert_eq!(failing.enriched_slot_count(), 0);
    // a degraded plan still counts as a successful simulation
    assert_eq!(failing.uses_remaining, 0);
}

#[tokio::test]
async fn test_slow_places_time_out_per_lookup() {
    let planner = TripPlanner::new(store_with("pam", CallerQuota::premium()), Arc::new(SlowPlaces))
        .with_config(PlannerConfig::default().with_lookup_timeout(Duration::from_millis(50)));

    let result = planner.simulate(&mid_request("pam", 400.0)).await.unwrap();
    assert_eq!(result.enriched_slot_count(), 0);
}

#[tokio::test]
async fn test_request_timeout_keeps_quota() {
    let store = store_with("ivy", CallerQuota::free(1));
    let planner = TripPlanner::new(store.clone(), Arc::new(SlowPlaces)).with_config(
        PlannerConfig::default()
            .with_lookup_timeout(Duration::from_secs(10))
            .with_request_timeout(Duration::from_millis(100)),
    );

    let err = planner.simulate(&mid_request("ivy", 400.0)).await.unwrap_err();
    assert!(matches!(err, PlannerError::Timeout(_)));
    assert_eq!(
        store.quota(&CallerId::new("ivy")).await,
        Some(CallerQuota::free(1))
    );
}

#[tokio::test]
async fn test_enrichment_picks_from_top_three() {
    let planner = TripPlanner::new(store_with("pam", CallerQuota::premium()), Arc::new(StubPlaces::default()))
        .with_seed(11);
    let result = planner.simulate(&mid_request("pam", 1000.0)).await.unwrap();

    assert_eq!(result.enriched_slot_count(), 30);
    for slot in result.schedule.iter().flat_map(|day| day.slots.iter()) {
        let enrichment = slot.enrichment.as_ref().unwrap();
        let rank: usize = enrichment
            .place_name
            .rsplit('#')
            .next()
            .and_then(|idx| idx.parse().ok())
            .unwrap();
        assert!(rank < 3);
        let expected_photo = (rank % 2 == 0).then(|| format!("photo-{rank}"));
        assert_eq!(enrichment.photo_ref, expected_photo);
        assert!(slot.description.ends_with(&enrichment.place_name));
        assert!(enrichment.place_note.ends_with("(Rating: 4.0/5)"));
    }
}

#[tokio::test]
async fn test_seeded_pipeline_is_deterministic() {
    let run = |seed| async move {
        TripPlanner::new(store_with("pam", CallerQuota::premium()), Arc::new(StubPlaces::default()))
            .with_seed(seed)
            .simulate(&mid_request("pam", 2000.0))
            .await
            .unwrap()
    };

    let first = run(5).await;
    let second = run(5).await;
    assert_eq!(first.schedule, second.schedule);
    assert_eq!(first.narrative, second.narrative);
}

#[tokio::test]
async fn test_enrichment_can_be_disabled() {
    let places = Arc::new(StubPlaces::default());
    let planner = TripPlanner::new(store_with("pam", CallerQuota::premium()), places.clone())
        .with_config(PlannerConfig::default().with_enrichment(false));

    let result = planner.simulate(&mid_request("pam", 1000.0)).await.unwrap();
    assert_eq!(result.enriched_slot_count(), 0);
    assert_eq!(places.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_json_entry_point() {
    let planner = TripPlanner::new(Arc::new(InMemoryQuotaStore::default()), Arc::new(NoopPlaceOracle));
    let raw = json!({
        "callerId": "new-user",
        "destination": "Marseille",
        "totalBudget": 600,
        "lodgingTier": "économique",
        "foodTier": "basique",
        "activityTier": "découverte"
    })
    .to_string();

    let result = planner.simulate_json(&raw).await.unwrap();
    // economy 30 + basic 23 + discovery 0 = 53/day
    assert_eq!(result.day_count, 5);
    assert_eq!(result.uses_remaining, 2);
    assert_eq!(result.schedule[0].slots[0].slot, TimeSlot::Breakfast);

    let body = serde_json::to_value(&result).unwrap();
    assert_eq!(body["dayCount"], 5);
    assert!(body["schedule"][0]["slots"][0]["timeOfDay"].is_string());
}

#[tokio::test]
async fn test_json_entry_point_rejects_bad_payload() {
    let store = Arc::new(InMemoryQuotaStore::default());
    let planner = TripPlanner::new(store.clone(), Arc::new(NoopPlaceOracle));

    let err = planner
        .simulate_json(r#"{"callerId": "x", "destination": "Nice"}"#)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert_eq!(err.status_code(), 400);
    assert_eq!(store.quota(&CallerId::new("x")).await, None);
}

#[tokio::test]
async fn test_concurrent_callers_do_not_wait_on_each_other() {
    let store = Arc::new(
        InMemoryQuotaStore::new(0)
            .with_account("ada", CallerQuota::premium())
            .with_account("bea", CallerQuota::premium()),
    );
    // one day is six lookups, a single round at six-way concurrency
    let planner = TripPlanner::new(store, Arc::new(PausedPlaces(Duration::from_millis(300))))
        .with_seed(4)
        .with_config(PlannerConfig::default().with_request_timeout(Duration::from_millis(500)));

    let ada = mid_request("ada", 100.0).with_day_override(1);
    let bea = mid_request("bea", 100.0).with_day_override(1);
    let (first, second) = tokio::join!(planner.simulate(&ada), planner.simulate(&bea));

    let first = first.unwrap();
    let second = second.unwrap();
    assert_eq!(first.enriched_slot_count(), 6);
    assert_eq!(second.enriched_slot_count(), 6);
}

#[tokio::test]
async fn test_quota_top_up_reopens_simulations() {
    let store = store_with("kim", CallerQuota::free(0));
    let planner = TripPlanner::new(store.clone(), Arc::new(NoopPlaceOracle));
    let request = mid_request("kim", 800.0);

    assert!(matches!(
        planner.simulate(&request).await,
        Err(PlannerError::QuotaExceeded { .. })
    ));

    store.set_quota("kim", CallerQuota::premium()).await;
    let result = planner.simulate(&request).await.unwrap();
    assert!(result.is_premium);
    assert_eq!(result.uses_remaining, -1);
}

#[tokio::test]
async fn test_result_renders_as_camel_case_json() {
    let planner = TripPlanner::new(store_with("lea", CallerQuota::free(1)), Arc::new(NoopPlaceOracle));
    let result = planner.simulate(&mid_request("lea", 700.0)).await.unwrap();

    let text = result.to_json_pretty().unwrap();
    let body: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["dayCount"], 4);
    assert_eq!(body["usesRemaining"], 0);
    assert_eq!(body["schedule"].as_array().unwrap().len(), 4);
}

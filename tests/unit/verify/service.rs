use crate::support::{level, owner, snapshot, stored, InMemoryStore, ScriptedPriceProvider};
use chrono::{Duration, Utc};
use std::sync::Arc;
use structrix::cache::VerificationCache;
use structrix::config::Config;
use structrix::error::EngineError;
use structrix::models::judgment::{
    Ma200Position, StructureStatus, StructureType, VerificationStatus,
};
use structrix::verify::VerificationService;

fn service(
    store: Arc<InMemoryStore>,
    prices: Arc<ScriptedPriceProvider>,
    cache: Arc<VerificationCache>,
) -> VerificationService {
    VerificationService::new(store, prices, cache, &Config::default())
}

#[tokio::test]
async fn unknown_judgment_is_an_error() {
    let store = Arc::new(InMemoryStore::default());
    let prices = Arc::new(ScriptedPriceProvider::new());
    let svc = service(store, prices, Arc::new(VerificationCache::default()));

    let err = svc.verify_judgment("missing").await.unwrap_err();
    assert!(matches!(err, EngineError::JudgmentNotFound(_)));
}

#[tokio::test]
async fn expired_window_resolves_checked_without_fetching_prices() {
    let mut snap = snapshot(
        "600000",
        StructureType::Uptrend,
        Ma200Position::Above,
        vec![level(95.0, "support 1")],
    );
    snap.snapshot_time = Utc::now() - Duration::days(10);

    let store = Arc::new(InMemoryStore::with(vec![stored("j1", "u1", snap)]));
    let prices = Arc::new(ScriptedPriceProvider::new());
    let svc = service(store.clone(), prices.clone(), Arc::new(VerificationCache::default()));

    let report = svc.verify_judgment("j1").await.unwrap();

    assert_eq!(report.status, VerificationStatus::Checked);
    assert!(report.reason.contains("verification window expired"));
    assert!(report.reason.contains("7 day window"));
    assert_eq!(prices.call_count(), 0);
    assert_eq!(store.check_count(), 0);
    assert_eq!(store.status_of("j1"), Some(VerificationStatus::Checked));
    assert!(store
        .reason_of("j1")
        .expect("reason persisted")
        .contains("verification window expired"));
}

#[tokio::test]
async fn maintained_structure_confirms_the_judgment() {
    let snap = snapshot(
        "600000",
        StructureType::Uptrend,
        Ma200Position::Above,
        vec![level(95.0, "support 1")],
    );
    let store = Arc::new(InMemoryStore::with(vec![stored("j1", "u1", snap)]));
    let prices = Arc::new(
        ScriptedPriceProvider::new().script(
            "600000",
            vec![100.0, 101.0, 102.0, 103.0, 105.0],
            Some(90.0),
        ),
    );
    let cache = Arc::new(VerificationCache::default());
    let svc = service(store.clone(), prices.clone(), cache.clone());

    let report = svc.verify_judgment("j1").await.unwrap();

    assert_eq!(report.status, VerificationStatus::Confirmed);
    assert_eq!(store.status_of("j1"), Some(VerificationStatus::Confirmed));
    assert_eq!(store.check_count(), 1);

    let check = cache.get("j1").expect("cache refreshed after verification");
    assert_eq!(check.structure_status, StructureStatus::Maintained);
    assert!((check.current_price - 105.0).abs() < 1e-9);
}

#[tokio::test]
async fn broken_structure_marks_the_judgment_broken() {
    let snap = snapshot(
        "600000",
        StructureType::Uptrend,
        Ma200Position::Above,
        vec![level(100.0, "support 1")],
    );
    let store = Arc::new(InMemoryStore::with(vec![stored("j1", "u1", snap)]));
    let prices = Arc::new(
        ScriptedPriceProvider::new().script("600000", vec![102.0, 95.0, 90.0], None),
    );
    let svc = service(store.clone(), prices, Arc::new(VerificationCache::default()));

    let report = svc.verify_judgment("j1").await.unwrap();

    assert_eq!(report.status, VerificationStatus::Broken);
    assert_eq!(report.reason, "price broke below key support");
    assert_eq!(store.status_of("j1"), Some(VerificationStatus::Broken));
    let checks = store.checks.lock().unwrap();
    assert_eq!(checks[0].structure_status, StructureStatus::Broken);
    assert!(checks[0].reasons.len() <= 3);
}

#[tokio::test]
async fn weakened_structure_resolves_to_checked() {
    let snap = snapshot(
        "600000",
        StructureType::Consolidation,
        Ma200Position::Near,
        vec![level(90.0, "support 1"), level(110.0, "resistance 1")],
    );
    let store = Arc::new(InMemoryStore::with(vec![stored("j1", "u1", snap)]));
    let prices = Arc::new(
        ScriptedPriceProvider::new().script("600000", vec![100.0, 105.0, 112.0], None),
    );
    let svc = service(store.clone(), prices, Arc::new(VerificationCache::default()));

    let report = svc.verify_judgment("j1").await.unwrap();

    assert_eq!(report.status, VerificationStatus::Checked);
    assert_eq!(store.status_of("j1"), Some(VerificationStatus::Checked));
}

#[tokio::test]
async fn price_fetch_failure_resolves_checked_without_a_check_record() {
    let snap = snapshot(
        "600000",
        StructureType::Uptrend,
        Ma200Position::Above,
        vec![level(95.0, "support 1")],
    );
    let store = Arc::new(InMemoryStore::with(vec![stored("j1", "u1", snap)]));
    let prices = Arc::new(ScriptedPriceProvider::failing());
    let svc = service(store.clone(), prices.clone(), Arc::new(VerificationCache::default()));

    let report = svc.verify_judgment("j1").await.unwrap();

    assert_eq!(report.status, VerificationStatus::Checked);
    assert_eq!(report.reason, "price data unavailable");
    assert_eq!(prices.call_count(), 1);
    assert_eq!(store.check_count(), 0);
    assert_eq!(store.status_of("j1"), Some(VerificationStatus::Checked));
}

#[tokio::test]
async fn empty_price_series_counts_as_unavailable() {
    let snap = snapshot(
        "600000",
        StructureType::Uptrend,
        Ma200Position::Above,
        vec![level(95.0, "support 1")],
    );
    let store = Arc::new(InMemoryStore::with(vec![stored("j1", "u1", snap)]));
    let prices = Arc::new(ScriptedPriceProvider::new().script("600000", vec![], None));
    let svc = service(store.clone(), prices, Arc::new(VerificationCache::default()));

    let report = svc.verify_judgment("j1").await.unwrap();
    assert_eq!(report.status, VerificationStatus::Checked);
    assert_eq!(report.reason, "price data unavailable");
}

#[tokio::test]
async fn lazy_verify_covers_every_pending_judgment_for_the_owner() {
    let store = Arc::new(InMemoryStore::with(vec![
        stored(
            "j1",
            "u1",
            snapshot(
                "600000",
                StructureType::Uptrend,
                Ma200Position::Above,
                vec![level(95.0, "support 1")],
            ),
        ),
        stored(
            "j2",
            "u1",
            snapshot(
                "000001",
                StructureType::Consolidation,
                Ma200Position::Near,
                vec![level(90.0, "support 1"), level(110.0, "resistance 1")],
            ),
        ),
    ]));
    let prices = Arc::new(
        ScriptedPriceProvider::new()
            .script("600000", vec![100.0, 103.0, 105.0], Some(90.0))
            .script("000001", vec![100.0, 101.0, 102.0], None),
    );
    let svc = service(store.clone(), prices, Arc::new(VerificationCache::default()));

    let stats = svc.lazy_verify(&owner("u1")).await;

    assert_eq!(stats.checked, 2);
    assert_eq!(stats.updated, 2);
    assert_eq!(store.status_of("j1"), Some(VerificationStatus::Confirmed));
    assert_eq!(store.status_of("j2"), Some(VerificationStatus::Confirmed));
}

#[tokio::test]
async fn recently_checked_judgments_are_skipped() {
    let mut judgment = stored(
        "j1",
        "u1",
        snapshot(
            "600000",
            StructureType::Uptrend,
            Ma200Position::Above,
            vec![level(95.0, "support 1")],
        ),
    );
    judgment.last_checked_at = Some(Utc::now() - Duration::hours(1));

    let store = Arc::new(InMemoryStore::with(vec![judgment]));
    let prices = Arc::new(ScriptedPriceProvider::new());
    let svc = service(store, prices.clone(), Arc::new(VerificationCache::default()));

    let stats = svc.lazy_verify(&owner("u1")).await;

    assert_eq!(stats.checked, 0);
    assert_eq!(prices.call_count(), 0);
}

#[tokio::test]
async fn sweep_visits_every_owner_and_settles_pending_judgments() {
    let store = Arc::new(InMemoryStore::with(vec![
        stored(
            "j1",
            "u1",
            snapshot(
                "600000",
                StructureType::Uptrend,
                Ma200Position::Above,
                vec![level(95.0, "support 1")],
            ),
        ),
        stored(
            "j2",
            "u2",
            snapshot(
                "000001",
                StructureType::Downtrend,
                Ma200Position::Below,
                vec![level(110.0, "resistance 1")],
            ),
        ),
    ]));
    let prices = Arc::new(
        ScriptedPriceProvider::new()
            .script("600000", vec![100.0, 103.0, 105.0], Some(90.0))
            .script("000001", vec![100.0, 99.0, 98.0], Some(120.0)),
    );
    let svc = service(store.clone(), prices, Arc::new(VerificationCache::default()));

    let stats = svc.run_sweep().await;
    assert_eq!(stats.checked, 2);
    assert_eq!(stats.updated, 2);

    // everything settled, the next sweep has nothing to do
    let again = svc.run_sweep().await;
    assert_eq!(again.checked, 0);
}

#[tokio::test]
async fn latest_verification_reads_through_the_cache() {
    let snap = snapshot(
        "600000",
        StructureType::Uptrend,
        Ma200Position::Above,
        vec![level(95.0, "support 1")],
    );
    let store = Arc::new(InMemoryStore::with(vec![stored("j1", "u1", snap)]));
    let prices = Arc::new(
        ScriptedPriceProvider::new().script("600000", vec![100.0, 103.0, 105.0], Some(90.0)),
    );
    let cache = Arc::new(VerificationCache::default());
    let svc = service(store.clone(), prices, cache.clone());

    assert!(svc.latest_verification("j1").await.is_none());

    svc.verify_judgment("j1").await.unwrap();
    let first = svc.latest_verification("j1").await.expect("cached check");

    // drop the store copy; the cache still serves the payload
    store.checks.lock().unwrap().clear();
    let second = svc.latest_verification("j1").await.expect("served from cache");
    assert_eq!(first.check_time, second.check_time);

    svc.invalidate("j1");
    assert!(svc.latest_verification("j1").await.is_none());
}

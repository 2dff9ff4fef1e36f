use std::time::Duration;

use tickerdeck::{
    CacheConfig, Capability, DataKind, Payload, ProviderId, ResultCache, Tickerdeck,
    TickerdeckError, TimeRange,
};
use tickerdeck_mock::{DynamicMockConnector, MockBehavior};

use crate::helpers::{AAPL, MSFT, bars, t};

#[tokio::test]
async fn repeat_calls_are_served_from_cache() {
    let (p0, controller) = DynamicMockConnector::new_with_controller("p0");
    controller
        .set_price_behavior(t(AAPL), MockBehavior::Return(bars(AAPL, 4)))
        .await;
    let deck = Tickerdeck::builder().with_connector(p0).build().unwrap();

    let first = deck.prices(&t(AAPL), TimeRange::OneMonth).await.unwrap();
    let second = deck.prices(&t(AAPL), TimeRange::OneMonth).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(controller.calls(Capability::Price).await, 1);

    // A different range is a different key.
    deck.prices(&t(AAPL), TimeRange::OneWeek).await.unwrap();
    assert_eq!(controller.calls(Capability::Price).await, 2);

    let entry = deck.cache().entry("price|AAPL|1M").await.unwrap();
    assert_eq!(entry.provider, ProviderId::new("p0"));
}

#[tokio::test]
async fn failures_are_not_cached() {
    let (p0, controller) = DynamicMockConnector::new_with_controller("p0");
    controller
        .set_overview_behavior(
            t(MSFT),
            MockBehavior::Fail(TickerdeckError::rate_limited("p0", "slow down")),
        )
        .await;
    let deck = Tickerdeck::builder().with_connector(p0).build().unwrap();

    for _ in 0..2 {
        let err = deck.overview(&t(MSFT)).await.unwrap_err();
        assert!(matches!(err, TickerdeckError::RateLimited { .. }));
    }
    assert_eq!(controller.calls(Capability::Overview).await, 2);
    assert!(deck.cache().entry("overview|MSFT").await.is_none());
}

#[tokio::test]
async fn zero_ttl_disables_caching_for_that_capability() {
    let (p0, controller) = DynamicMockConnector::new_with_controller("p0");
    controller
        .set_price_behavior(t(AAPL), MockBehavior::Return(bars(AAPL, 2)))
        .await;
    let deck = Tickerdeck::builder()
        .with_connector(p0)
        .cache(CacheConfig::default().with_ttl(Capability::Price, Duration::ZERO))
        .build()
        .unwrap();

    deck.prices(&t(AAPL), TimeRange::OneMonth).await.unwrap();
    deck.prices(&t(AAPL), TimeRange::OneMonth).await.unwrap();
    assert_eq!(controller.calls(Capability::Price).await, 2);
}

#[tokio::test]
async fn concurrent_misses_share_one_fetch() {
    let (p0, controller) = DynamicMockConnector::new_with_controller("p0");
    controller
        .set_price_behavior(t(AAPL), MockBehavior::Return(bars(AAPL, 3)))
        .await;
    let deck = Tickerdeck::builder().with_connector(p0).build().unwrap();
    let aapl = t(AAPL);

    let (a, b, c) = tokio::join!(
        deck.prices(&aapl, TimeRange::OneMonth),
        deck.prices(&aapl, TimeRange::OneMonth),
        deck.prices(&aapl, TimeRange::OneMonth),
    );
    assert_eq!(a.unwrap().value.len(), 3);
    assert_eq!(b.unwrap().value.len(), 3);
    assert_eq!(c.unwrap().value.len(), 3);
    assert_eq!(controller.calls(Capability::Price).await, 1);
}

#[tokio::test]
async fn untyped_fetch_shares_the_typed_cache() {
    let (p0, controller) = DynamicMockConnector::new_with_controller("p0");
    controller
        .set_price_behavior(t(AAPL), MockBehavior::Return(bars(AAPL, 2)))
        .await;
    let deck = Tickerdeck::builder().with_connector(p0).build().unwrap();

    let payload = deck
        .fetch(&t(AAPL), DataKind::Price { range: TimeRange::ThreeMonths })
        .await
        .unwrap();
    assert!(matches!(payload.value, Payload::Prices(ref v) if v.len() == 2));

    let typed = deck.prices(&t(AAPL), TimeRange::ThreeMonths).await.unwrap();
    assert_eq!(typed.value.len(), 2);
    assert_eq!(controller.calls(Capability::Price).await, 1);
}

#[tokio::test]
async fn shared_cache_spans_orchestrators() {
    let shared = ResultCache::new(100);
    let (p0, c0) = DynamicMockConnector::new_with_controller("p0");
    let (p1, c1) = DynamicMockConnector::new_with_controller("p1");
    c0.set_price_behavior(t(AAPL), MockBehavior::Return(bars(AAPL, 2)))
        .await;
    c1.set_price_behavior(t(AAPL), MockBehavior::Return(bars(AAPL, 9)))
        .await;

    let first = Tickerdeck::builder()
        .with_connector(p0)
        .result_cache(shared.clone())
        .build()
        .unwrap();
    let second = Tickerdeck::builder()
        .with_connector(p1)
        .result_cache(shared)
        .build()
        .unwrap();

    first.prices(&t(AAPL), TimeRange::OneYear).await.unwrap();
    let out = second.prices(&t(AAPL), TimeRange::OneYear).await.unwrap();
    assert_eq!(out.provider, ProviderId::new("p0"));
    assert_eq!(c1.calls(Capability::Price).await, 0);
}

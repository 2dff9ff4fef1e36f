use std::time::Duration;

use tickerdeck::{
    Capability, NewsWindow, ProviderId, Tickerdeck, TickerdeckError, TimeRange,
};
use tickerdeck_mock::{DynamicMockConnector, DynamicMockController, MockBehavior};

use crate::helpers::{AAPL, bars, t};

fn pair() -> (Tickerdeck, DynamicMockController, DynamicMockController) {
    let (p0, c0) = DynamicMockConnector::new_with_controller("p0");
    let (p1, c1) = DynamicMockConnector::new_with_controller("p1");
    let deck = Tickerdeck::builder()
        .with_connector(p0)
        .with_connector(p1)
        .route(Capability::Price, ProviderId::new("p0"), Some(ProviderId::new("p1")))
        .route(Capability::News, ProviderId::new("p0"), Some(ProviderId::new("p1")))
        .provider_timeout(Duration::from_secs(1))
        .build()
        .unwrap();
    (deck, c0, c1)
}

#[tokio::test]
async fn primary_success_never_touches_secondary() {
    let (deck, c0, c1) = pair();
    c0.set_price_behavior(t(AAPL), MockBehavior::Return(bars(AAPL, 5)))
        .await;

    let out = deck.prices(&t(AAPL), TimeRange::OneMonth).await.unwrap();
    assert_eq!(out.provider, ProviderId::new("p0"));
    assert_eq!(c1.calls(Capability::Price).await, 0);
}

#[tokio::test]
async fn eligible_failures_fall_back() {
    let eligible = [
        TickerdeckError::rate_limited("p0", "429"),
        TickerdeckError::forbidden("p0", "403"),
        TickerdeckError::configuration("p0", "FINNHUB_API_KEY is not set"),
        TickerdeckError::transport("p0", "connection reset"),
        TickerdeckError::circuit_open("p0", "price"),
        TickerdeckError::not_found("price data for AAPL"),
        TickerdeckError::Data("bad csv".into()),
    ];
    for err in eligible {
        let (deck, c0, c1) = pair();
        c0.set_price_behavior(t(AAPL), MockBehavior::Fail(err.clone()))
            .await;
        c1.set_price_behavior(t(AAPL), MockBehavior::Return(bars(AAPL, 2)))
            .await;

        let out = deck.prices(&t(AAPL), TimeRange::OneMonth).await.unwrap();
        assert_eq!(out.provider, ProviderId::new("p1"), "after {err}");
        assert_eq!(c1.calls(Capability::Price).await, 1);
    }
}

#[tokio::test]
async fn invalid_argument_does_not_fall_back() {
    let (deck, c0, c1) = pair();
    c0.set_price_behavior(
        t(AAPL),
        MockBehavior::Fail(TickerdeckError::InvalidArg("bad range".into())),
    )
    .await;
    c1.set_price_behavior(t(AAPL), MockBehavior::Return(bars(AAPL, 2)))
        .await;

    let err = deck.prices(&t(AAPL), TimeRange::OneMonth).await.unwrap_err();
    assert!(matches!(err, TickerdeckError::InvalidArg(_)));
    assert_eq!(c1.calls(Capability::Price).await, 0);
}

#[tokio::test]
async fn both_failing_surfaces_the_secondary_error() {
    let (deck, c0, c1) = pair();
    c0.set_news_behavior(
        t(AAPL),
        MockBehavior::Fail(TickerdeckError::rate_limited("p0", "limit")),
    )
    .await;
    c1.set_news_behavior(
        t(AAPL),
        MockBehavior::Fail(TickerdeckError::forbidden("p1", "bad key")),
    )
    .await;

    let err = deck.news(&t(AAPL), NewsWindow::Week).await.unwrap_err();
    assert_eq!(err, TickerdeckError::forbidden("p1", "bad key"));
}

#[tokio::test(start_paused = true)]
async fn hung_primary_times_out_then_secondary_answers() {
    let (deck, c0, c1) = pair();
    c0.set_price_behavior(t(AAPL), MockBehavior::Hang).await;
    c1.set_price_behavior(t(AAPL), MockBehavior::Return(bars(AAPL, 3)))
        .await;

    let started = tokio::time::Instant::now();
    let out = deck.prices(&t(AAPL), TimeRange::OneMonth).await.unwrap();
    assert_eq!(out.provider, ProviderId::new("p1"));
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(1) && waited < Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn hung_pair_reports_the_secondary_timeout() {
    let (deck, c0, c1) = pair();
    c0.set_price_behavior(t(AAPL), MockBehavior::Hang).await;
    c1.set_price_behavior(t(AAPL), MockBehavior::Hang).await;

    let err = deck.prices(&t(AAPL), TimeRange::OneMonth).await.unwrap_err();
    assert_eq!(err, TickerdeckError::provider_timeout("p1", "price"));
}

#[tokio::test]
async fn single_provider_error_propagates() {
    let (p0, c0) = DynamicMockConnector::new_with_controller("p0");
    c0.set_price_behavior(
        t(AAPL),
        MockBehavior::Fail(TickerdeckError::transport("p0", "down")),
    )
    .await;
    let deck = Tickerdeck::builder().with_connector(p0).build().unwrap();

    let err = deck.prices(&t(AAPL), TimeRange::OneMonth).await.unwrap_err();
    assert_eq!(err, TickerdeckError::transport("p0", "down"));
}

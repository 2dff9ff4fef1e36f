use tickerdeck::{
    Capability, ProviderId, ProviderPair, Tickerdeck, TickerdeckError, TimeRange,
};
use tickerdeck_mock::{DynamicMockConnector, MockBehavior};

use crate::helpers::{AAPL, bars, t};

#[test]
fn build_without_connectors_fails() {
    let err = Tickerdeck::builder().build().unwrap_err();
    assert!(matches!(err, TickerdeckError::InvalidArg(_)));
}

#[tokio::test]
async fn missing_primary_promotes_secondary() {
    // Default price routing is finnhub -> stooq; only stooq is registered.
    let (stooq, controller) = DynamicMockConnector::new_with_controller("stooq");
    controller
        .set_price_behavior(t(AAPL), MockBehavior::Return(bars(AAPL, 3)))
        .await;

    let deck = Tickerdeck::builder().with_connector(stooq).build().unwrap();
    let routing = deck.routing();
    assert!(routing.contains(&(Capability::Price, ProviderPair::single(ProviderId::STOOQ))));

    let out = deck.prices(&t(AAPL), TimeRange::OneMonth).await.unwrap();
    assert_eq!(out.provider, ProviderId::STOOQ);
    assert_eq!(out.value.len(), 3);
}

#[test]
fn incapable_connectors_are_dropped_from_routes() {
    let (finnhub, _c1) = DynamicMockConnector::with_capabilities("finnhub", &[Capability::News]);
    let (stooq, _c2) = DynamicMockConnector::with_capabilities("stooq", &[Capability::Price]);

    let deck = Tickerdeck::builder()
        .with_connector(finnhub)
        .with_connector(stooq)
        .build()
        .unwrap();

    let routing = deck.routing();
    // finnhub cannot serve prices, so stooq is promoted.
    assert!(routing.contains(&(Capability::Price, ProviderPair::single(ProviderId::STOOQ))));
    // gdelt is missing, so finnhub is promoted for news.
    assert!(routing.contains(&(Capability::News, ProviderPair::single(ProviderId::FINNHUB))));
    assert_eq!(routing.len(), 2);
}

#[test]
fn unrouted_capability_uses_first_capable_connector() {
    let (alpha, _c1) = DynamicMockConnector::with_capabilities("alpha", &[Capability::News]);
    let (beta, _c2) = DynamicMockConnector::new_with_controller("beta");
    let (gamma, _c3) = DynamicMockConnector::new_with_controller("gamma");

    let deck = Tickerdeck::builder()
        .with_connector(alpha)
        .with_connector(beta)
        .with_connector(gamma)
        .build()
        .unwrap();

    let routing = deck.routing();
    assert!(routing.contains(&(Capability::News, ProviderPair::single(ProviderId::new("alpha")))));
    assert!(routing.contains(&(Capability::Price, ProviderPair::single(ProviderId::new("beta")))));
    assert!(
        routing.contains(&(Capability::Overview, ProviderPair::single(ProviderId::new("beta"))))
    );
}

#[test]
fn explicit_route_keeps_both_and_ignores_self_fallback() {
    let (p0, _c0) = DynamicMockConnector::new_with_controller("p0");
    let (p1, _c1) = DynamicMockConnector::new_with_controller("p1");
    let p0_id = ProviderId::new("p0");
    let p1_id = ProviderId::new("p1");

    let deck = Tickerdeck::builder()
        .with_connector(p0)
        .with_connector(p1)
        .route(Capability::Price, p1_id, Some(p0_id))
        .route(Capability::News, p0_id, Some(p0_id))
        .build()
        .unwrap();

    let routing = deck.routing();
    assert!(routing.contains(&(Capability::Price, ProviderPair::new(p1_id, p0_id))));
    assert!(routing.contains(&(Capability::News, ProviderPair::single(p0_id))));
}

#[tokio::test]
async fn capability_nobody_serves_is_unsupported() {
    let (news_only, controller) =
        DynamicMockConnector::with_capabilities("news-only", &[Capability::News]);
    let deck = Tickerdeck::builder().with_connector(news_only).build().unwrap();

    let err = deck.prices(&t(AAPL), TimeRange::OneWeek).await.unwrap_err();
    assert!(matches!(err, TickerdeckError::Unsupported { ref capability } if capability == "price"));
    let err = deck.overview(&t(AAPL)).await.unwrap_err();
    assert!(matches!(err, TickerdeckError::Unsupported { .. }));
    assert_eq!(controller.calls(Capability::Price).await, 0);
    assert_eq!(deck.cache().entry_count().await, 0);
}

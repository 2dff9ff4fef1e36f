use std::sync::Arc;

use tickerdeck::{
    Capability, HttpResponse, ProviderId, Tickerdeck, TickerdeckError, TimeRange,
};
use tickerdeck_providers::{FinnhubConnector, StooqConnector};

use crate::helpers::{AAPL, hits, plumbing, recording, registry, stooq_csv, t};

#[tokio::test]
async fn forbidden_finnhub_falls_back_to_stooq_and_caches() {
    let (transport, seen) = recording(|url| match url.host_str() {
        Some("finnhub.io") => Ok(HttpResponse::with_status(
            403,
            r#"{"error":"You don't have access to this resource."}"#,
        )),
        Some("stooq.com") => Ok(HttpResponse::ok(stooq_csv(22))),
        other => Err(TickerdeckError::transport("test", format!("unexpected host {other:?}"))),
    });
    let breakers = registry();
    let finnhub = FinnhubConnector::new(
        "fh-key",
        plumbing(FinnhubConnector::KEY, &transport, &breakers),
    );
    let stooq = StooqConnector::new(plumbing(StooqConnector::KEY, &transport, &breakers));

    let deck = Tickerdeck::builder()
        .with_connector(Arc::new(finnhub))
        .with_connector(Arc::new(stooq))
        .route(Capability::Price, ProviderId::FINNHUB, Some(ProviderId::STOOQ))
        .breakers(Arc::clone(&breakers))
        .build()
        .unwrap();

    let out = deck.prices(&t(AAPL), TimeRange::OneMonth).await.unwrap();
    assert_eq!(out.provider, ProviderId::STOOQ);
    assert_eq!(out.value.len(), 22);
    assert!(out.value[0].date > out.value[21].date, "newest first");
    assert_eq!(out.value[0].close, 201.0);
    // 403 is not retried.
    assert_eq!(hits(&seen, "finnhub.io"), 1);
    assert_eq!(hits(&seen, "stooq.com"), 1);

    let entry = deck.cache().entry("price|AAPL|1M").await.unwrap();
    assert_eq!(entry.provider, ProviderId::STOOQ);

    let again = deck.prices(&t(AAPL), TimeRange::OneMonth).await.unwrap();
    assert_eq!(again, out);
    assert_eq!(seen.lock().unwrap().len(), 2, "repeat call is a cache hit");
}

#[tokio::test]
async fn open_breaker_skips_straight_to_secondary() {
    let (transport, seen) = recording(|url| match url.host_str() {
        Some("finnhub.io") => Ok(HttpResponse::with_status(429, "API limit reached")),
        Some("stooq.com") => Ok(HttpResponse::ok(stooq_csv(3))),
        other => Err(TickerdeckError::transport("test", format!("unexpected host {other:?}"))),
    });
    let breakers = registry();
    let finnhub = FinnhubConnector::new(
        "fh-key",
        plumbing(FinnhubConnector::KEY, &transport, &breakers),
    );
    let stooq = StooqConnector::new(plumbing(StooqConnector::KEY, &transport, &breakers));
    let deck = Tickerdeck::builder()
        .with_connector(Arc::new(finnhub))
        .with_connector(Arc::new(stooq))
        .route(Capability::Price, ProviderId::FINNHUB, Some(ProviderId::STOOQ))
        .cache(tickerdeck::CacheConfig::default().with_ttl(Capability::Price, std::time::Duration::ZERO))
        .breakers(Arc::clone(&breakers))
        .build()
        .unwrap();

    // Default threshold is five failures.
    for _ in 0..6 {
        let out = deck.prices(&t(AAPL), TimeRange::OneWeek).await.unwrap();
        assert_eq!(out.provider, ProviderId::STOOQ);
    }
    assert_eq!(hits(&seen, "finnhub.io"), 5);
    assert_eq!(hits(&seen, "stooq.com"), 6);

    let snapshot = deck.breaker_snapshot();
    let finnhub = snapshot
        .iter()
        .find(|s| s.provider == ProviderId::FINNHUB)
        .unwrap();
    assert!(finnhub.open);
}

use std::sync::Arc;
use std::time::Duration;

use tickerdeck::{
    BreakerConfig, Capability, CircuitBreakerRegistry, ConnectorFactory, Credentials,
    HttpResponse, ProviderId, ProviderPair, RetryPolicy, StatementKind, Period, Tickerdeck,
    TickerdeckConfig, TickerdeckError, TimeRange,
};

use crate::helpers::{AAPL, hits, recording, stooq_csv, t};

fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |k| {
        vars.iter()
            .find(|(name, _)| *name == k)
            .map(|(_, v)| (*v).to_string())
    }
}

#[test]
fn from_lookup_skips_vendors_without_keys() {
    let deck = Tickerdeck::from_lookup(env(&[("PRICE_PROVIDER", "stooq")])).unwrap();
    let routing = deck.routing();
    // stooq -> finnhub pair, but finnhub has no key.
    assert!(routing.contains(&(Capability::Price, ProviderPair::single(ProviderId::STOOQ))));
    assert!(routing.contains(&(Capability::News, ProviderPair::single(ProviderId::GDELT))));
    assert!(!routing.iter().any(|(cap, _)| *cap == Capability::Financials));
}

#[test]
fn from_lookup_rejects_unknown_provider() {
    let err = Tickerdeck::from_lookup(env(&[("NEWS_PROVIDER", "bloomberg")])).unwrap_err();
    assert!(matches!(err, TickerdeckError::InvalidArg(_)));
}

#[tokio::test]
async fn keyless_financials_are_unsupported_without_network() {
    let deck = Tickerdeck::from_lookup(env(&[])).unwrap();
    let err = deck
        .financials(&t(AAPL), StatementKind::Income, Period::Annual)
        .await
        .unwrap_err();
    assert!(matches!(err, TickerdeckError::Unsupported { .. }));
}

#[tokio::test]
async fn factory_wires_routing_breakers_and_fallback() {
    let (transport, seen) = recording(|url| match url.host_str() {
        Some("finnhub.io") => Ok(HttpResponse::with_status(503, "upstream down")),
        Some("stooq.com") => Ok(HttpResponse::ok(stooq_csv(5))),
        other => Err(TickerdeckError::transport("test", format!("unexpected host {other:?}"))),
    });
    let registry = Arc::new(CircuitBreakerRegistry::new(BreakerConfig::default()));
    let factory = ConnectorFactory::new(transport, registry, RetryPolicy::new(2, Duration::ZERO));
    let credentials = Credentials {
        finnhub: Some("fh-key".into()),
        ..Credentials::default()
    };

    let deck =
        Tickerdeck::with_factory(&factory, &TickerdeckConfig::default(), &credentials).unwrap();
    assert!(deck.routing().contains(&(
        Capability::Price,
        ProviderPair::new(ProviderId::FINNHUB, ProviderId::STOOQ)
    )));

    let out = deck.prices(&t(AAPL), TimeRange::OneMonth).await.unwrap();
    assert_eq!(out.provider, ProviderId::STOOQ);
    assert_eq!(out.value.len(), 5);
    // 503 is retried up to the policy's attempts before falling back.
    assert_eq!(hits(&seen, "finnhub.io"), 2);
    assert_eq!(hits(&seen, "stooq.com"), 1);

    let snapshot = deck.breaker_snapshot();
    let finnhub = snapshot
        .iter()
        .find(|s| s.provider == ProviderId::FINNHUB && s.capability == Capability::Price)
        .unwrap();
    assert_eq!(finnhub.failures, 1);
    assert!(!finnhub.open);
}

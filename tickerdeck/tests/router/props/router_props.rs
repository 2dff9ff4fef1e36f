use std::sync::Arc;

use async_trait::async_trait;
use proptest::prelude::*;
use tickerdeck::{
    Capability, PriceBar, ProviderId, Ticker, Tickerdeck, TickerdeckConnector, TickerdeckError,
    TimeRange,
};
use tickerdeck_core::PriceProvider;
use tickerdeck_mock::{DynamicMockConnector, MockBehavior};

use crate::helpers::{AAPL, bars, t};

/// Serves a fixed series for every ticker.
struct Flat;

#[async_trait]
impl PriceProvider for Flat {
    async fn prices(
        &self,
        ticker: &Ticker,
        _range: TimeRange,
    ) -> Result<Vec<PriceBar>, TickerdeckError> {
        Ok(bars(ticker.as_str(), 2))
    }
}

impl TickerdeckConnector for Flat {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn as_price_provider(&self) -> Option<&dyn PriceProvider> {
        Some(self as &dyn PriceProvider)
    }
}

#[tokio::test]
async fn custom_connector_serves_its_capability_only() {
    let deck = Tickerdeck::builder()
        .with_connector(Arc::new(Flat))
        .build()
        .unwrap();

    let view = deck.price_view(&t(AAPL), TimeRange::SixMonths).await.unwrap();
    assert_eq!(view.provider, ProviderId::new("flat"));

    let err = deck.overview(&t(AAPL)).await.unwrap_err();
    assert!(matches!(err, TickerdeckError::Unsupported { .. }));
}

#[tokio::test]
async fn views_serialize_with_wire_labels() {
    let deck = Tickerdeck::builder()
        .with_connector(Arc::new(Flat))
        .build()
        .unwrap();
    let view = deck.price_view(&t(AAPL), TimeRange::OneYear).await.unwrap();

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["ticker"], "AAPL");
    assert_eq!(json["range"], "1Y");
    assert_eq!(json["provider"], "flat");
    assert_eq!(json["bars"].as_array().unwrap().len(), 2);
    assert_eq!(json["summary"]["current"], 101.0);
}

fn any_error() -> impl Strategy<Value = TickerdeckError> {
    prop_oneof![
        Just(TickerdeckError::InvalidArg("bad".into())),
        Just(TickerdeckError::not_found("price data")),
        Just(TickerdeckError::rate_limited("p0", "429")),
        Just(TickerdeckError::forbidden("p0", "403")),
        Just(TickerdeckError::configuration("p0", "no key")),
        Just(TickerdeckError::transport("p0", "reset")),
        Just(TickerdeckError::provider_timeout("p0", "price")),
        Just(TickerdeckError::circuit_open("p0", "price")),
        Just(TickerdeckError::Data("garbled".into())),
        Just(TickerdeckError::connector("p0", "boom")),
        Just(TickerdeckError::unsupported("price")),
        Just(TickerdeckError::Other("?".into())),
    ]
}

fn any_range() -> impl Strategy<Value = TimeRange> {
    prop_oneof![
        Just(TimeRange::OneWeek),
        Just(TimeRange::OneMonth),
        Just(TimeRange::ThreeMonths),
        Just(TimeRange::SixMonths),
        Just(TimeRange::OneYear),
        Just(TimeRange::FiveYears),
        Just(TimeRange::Max),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn secondary_runs_exactly_when_the_error_allows(err in any_error(), range in any_range()) {
        let (provider, secondary_calls, outcome) = tokio_test::block_on(async {
            let (p0, c0) = DynamicMockConnector::new_with_controller("p0");
            let (p1, c1) = DynamicMockConnector::new_with_controller("p1");
            c0.set_price_behavior(t(AAPL), MockBehavior::Fail(err.clone())).await;
            c1.set_price_behavior(t(AAPL), MockBehavior::Return(bars(AAPL, 1))).await;
            let deck = Tickerdeck::builder()
                .with_connector(p0)
                .with_connector(p1)
                .route(Capability::Price, ProviderId::new("p0"), Some(ProviderId::new("p1")))
                .without_provider_timeout()
                .build()
                .unwrap();
            let out = deck.prices(&t(AAPL), range).await;
            let provider = out.as_ref().ok().map(|s| s.provider);
            (provider, c1.calls(Capability::Price).await, out.err())
        });

        if err.triggers_fallback() {
            prop_assert_eq!(provider, Some(ProviderId::new("p1")));
            prop_assert_eq!(secondary_calls, 1);
        } else {
            prop_assert_eq!(secondary_calls, 0);
            prop_assert_eq!(outcome, Some(err));
        }
    }
}

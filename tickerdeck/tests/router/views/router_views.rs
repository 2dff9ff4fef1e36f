use std::sync::Arc;

use tickerdeck::analytics::{Grade, StatementMetrics};
use tickerdeck::{
    Capability, NewsWindow, Period, ProviderId, Sentiment, StatementKind, Tickerdeck,
    TickerdeckError, TimeRange,
};
use tickerdeck_mock::{DynamicMockConnector, MockBehavior, MockConnector};

use crate::helpers::{AAPL, MSFT, bars, t};

fn deck() -> Tickerdeck {
    Tickerdeck::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn price_view_summarizes_the_series() {
    let view = deck().price_view(&t(AAPL), TimeRange::OneMonth).await.unwrap();
    assert_eq!(view.provider, ProviderId::new("mock"));
    assert_eq!(view.bars.len(), 30);
    assert_eq!(view.summary.current, view.bars[0].close);
    let day = (view.bars[0].close - view.bars[1].close) / view.bars[1].close * 100.0;
    assert!((view.summary.day_change_pct - day).abs() < 1e-9);
}

#[tokio::test]
async fn price_view_rejects_an_empty_series() {
    let (p0, controller) = DynamicMockConnector::new_with_controller("p0");
    controller
        .set_price_behavior(t(AAPL), MockBehavior::Return(Vec::new()))
        .await;
    let deck = Tickerdeck::builder().with_connector(p0).build().unwrap();
    let err = deck.price_view(&t(AAPL), TimeRange::OneWeek).await.unwrap_err();
    assert!(matches!(err, TickerdeckError::Data(_)));
}

#[tokio::test]
async fn compare_indexes_each_ticker_independently() {
    let (p0, controller) = DynamicMockConnector::new_with_controller("p0");
    controller
        .set_price_behavior(t(AAPL), MockBehavior::Return(bars(AAPL, 3)))
        .await;
    let deck = Tickerdeck::builder().with_connector(p0).build().unwrap();

    let out = deck.compare(&[t(AAPL), t(MSFT)], TimeRange::OneMonth).await;
    assert_eq!(out.len(), 2);
    let aapl = out[0].as_ref().unwrap();
    let expected = [100.0, 101.0, 102.0];
    assert_eq!(aapl.normalized.len(), 3);
    for (got, want) in aapl.normalized.iter().zip(expected) {
        assert!((got - want).abs() < 1e-9);
    }
    assert!(aapl.dates[0] < aapl.dates[2], "oldest first");
    assert!(matches!(out[1], Err(TickerdeckError::Unsupported { .. })));
}

#[tokio::test]
async fn cashflow_view_pulls_income_for_revenue() {
    let deck = deck();
    let view = deck
        .financials_view(&t(AAPL), StatementKind::Cashflow, Period::Annual)
        .await
        .unwrap();
    assert_eq!(view.statements.len(), 2);
    let StatementMetrics::Cashflow(metrics) = view.metrics else {
        panic!("expected cash flow metrics, got {:?}", view.metrics);
    };
    let latest = view.statements[0].cashflow().unwrap();
    assert_eq!(
        metrics.free_cash_flow,
        latest.operating_cashflow - latest.capital_expenditures.abs()
    );
    assert!(metrics.fcf_margin > 0.0);

    // The income statement fetched for revenue is now cached too.
    assert!(
        deck.cache()
            .entry("financials|AAPL|income|annual")
            .await
            .is_some()
    );
}

#[tokio::test]
async fn income_and_balance_views_compute_their_metrics() {
    let deck = deck();
    let income = deck
        .financials_view(&t(MSFT), StatementKind::Income, Period::Quarterly)
        .await
        .unwrap();
    assert!(matches!(income.metrics, StatementMetrics::Income(m) if m.gross_margin > 0.0));

    let balance = deck
        .financials_view(&t(MSFT), StatementKind::Balance, Period::Annual)
        .await
        .unwrap();
    assert!(matches!(balance.metrics, StatementMetrics::Balance(m) if m.current_ratio > 0.0));
}

#[tokio::test]
async fn news_view_dedupes_and_tags_sentiment() {
    let view = deck().news_view(&t(AAPL), NewsWindow::Week).await.unwrap();
    // The fixture carries one near-duplicate headline.
    assert_eq!(view.count, 3);
    assert_eq!(view.articles.len(), 3);
    assert!(view.articles.iter().all(|a| a.sentiment.is_some()));
    assert_eq!(view.articles[0].sentiment, Some(Sentiment::Positive));
}

#[tokio::test]
async fn overview_view_scores_when_inputs_suffice() {
    let view = deck().overview_view(&t(AAPL)).await.unwrap();
    assert_eq!(view.overview.name.as_deref(), Some("Apple Inc"));
    let quality = view.quality.unwrap();
    assert!((0.0..=10.0).contains(&quality.score));
    assert_eq!(quality.grade, Grade::from_score(quality.score));
    assert!(view.value.is_some());

    let (p0, controller) = DynamicMockConnector::with_capabilities("p0", &[Capability::Overview]);
    controller
        .set_overview_behavior(t(MSFT), MockBehavior::Return(Default::default()))
        .await;
    let sparse = Tickerdeck::builder().with_connector(p0).build().unwrap();
    let view = sparse.overview_view(&t(MSFT)).await.unwrap();
    assert!(view.quality.is_none());
    assert!(view.value.is_none());
}

#[tokio::test]
async fn validate_ticker_follows_the_price_route() {
    let deck = deck();
    assert!(deck.validate_ticker(&t(AAPL)).await);
    assert!(!deck.validate_ticker(&t("ZZZZ")).await);
    assert!(!deck.validate_ticker(&t("FAIL")).await);
}

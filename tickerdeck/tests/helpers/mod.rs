#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{NaiveDate, TimeDelta};
use tickerdeck_core::{
    BreakerConfig, CircuitBreakerRegistry, PriceBar, ProviderId, RetryPolicy, Ticker,
    TickerdeckError,
};
use tickerdeck_providers::{HttpResponse, HttpTransport, ResilientHttp};
use url::Url;

pub const AAPL: &str = "AAPL";
pub const MSFT: &str = "MSFT";

pub fn t(s: &str) -> Ticker {
    Ticker::parse(s).unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `n` consecutive daily bars ending 2024-03-01, newest first, closing at 100, 101, ...
pub fn bars(ticker: &str, n: usize) -> Vec<PriceBar> {
    let last = day(2024, 3, 1);
    (0..n)
        .map(|i| {
            let close = 100.0 + (n - 1 - i) as f64;
            PriceBar {
                ticker: ticker.to_string(),
                date: last - TimeDelta::days(i as i64),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000,
            }
        })
        .collect()
}

/// Stooq-style CSV with a header and `n` rows, oldest first.
pub fn stooq_csv(n: usize) -> String {
    let first = day(2024, 2, 1);
    let mut out = String::from("Date,Open,High,Low,Close,Volume\n");
    for i in 0..n {
        let d = first + TimeDelta::days(i as i64);
        let close = 180.0 + i as f64;
        out.push_str(&format!(
            "{d},{:.2},{:.2},{:.2},{close:.2},{}\n",
            close - 1.0,
            close + 1.0,
            close - 2.0,
            50_000 + i
        ));
    }
    out
}

/// Transport answering through `answer` and recording every requested URL.
pub fn recording(
    answer: impl Fn(&Url) -> Result<HttpResponse, TickerdeckError> + Send + Sync + 'static,
) -> (Arc<dyn HttpTransport>, Arc<Mutex<Vec<Url>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let transport = <dyn HttpTransport>::from_fn(move |url| {
        log.lock().unwrap().push(url.clone());
        answer(url)
    });
    (transport, seen)
}

pub fn hits(seen: &Arc<Mutex<Vec<Url>>>, host: &str) -> usize {
    seen.lock()
        .unwrap()
        .iter()
        .filter(|u| u.host_str() == Some(host))
        .count()
}

/// Shared plumbing with immediate retries so tests never sleep.
pub fn plumbing(
    provider: ProviderId,
    transport: &Arc<dyn HttpTransport>,
    registry: &Arc<CircuitBreakerRegistry>,
) -> ResilientHttp {
    ResilientHttp::new(
        provider,
        Arc::clone(transport),
        Arc::clone(registry),
        RetryPolicy::new(3, Duration::ZERO),
    )
}

pub fn registry() -> Arc<CircuitBreakerRegistry> {
    Arc::new(CircuitBreakerRegistry::new(BreakerConfig::default()))
}

/// Counts invocations; handy inside closures that must stay `Fn`.
#[derive(Debug, Default, Clone)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn bump(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

//! Provenance-tagged results and the untyped payload used by the cache.

use serde::Serialize;

use crate::{FinancialStatement, NewsArticle, Overview, PriceBar, ProviderId, TickerdeckError};

/// A successful result tagged with the provider that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sourced<T> {
    /// The payload.
    pub value: T,
    /// Provider that produced `value`.
    pub provider: ProviderId,
}

impl<T> Sourced<T> {
    /// Tag a value with its provider.
    pub const fn new(value: T, provider: ProviderId) -> Self {
        Self { value, provider }
    }

    /// Transform the payload while keeping provenance.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            value: f(self.value),
            provider: self.provider,
        }
    }
}

/// Either a provenance-tagged success or a typed failure.
pub type FetchOutcome<T> = Result<Sourced<T>, TickerdeckError>;

/// Any of the four canonical payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
    /// Price bars, newest first.
    Prices(Vec<PriceBar>),
    /// Statements, most recent first.
    Financials(Vec<FinancialStatement>),
    /// Articles.
    News(Vec<NewsArticle>),
    /// Company overview.
    Overview(Overview),
}

impl Payload {
    /// Variant label for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Prices(_) => "prices",
            Self::Financials(_) => "financials",
            Self::News(_) => "news",
            Self::Overview(_) => "overview",
        }
    }
}

/// Conversion between a typed payload and [`Payload`].
pub trait PayloadKind: Sized + Clone + Send + Sync + 'static {
    /// Wrap into the untyped payload.
    fn into_payload(self) -> Payload;

    /// Borrow-and-clone out of the untyped payload; `None` on a variant mismatch.
    fn from_payload(payload: &Payload) -> Option<Self>;
}

impl PayloadKind for Vec<PriceBar> {
    fn into_payload(self) -> Payload {
        Payload::Prices(self)
    }

    fn from_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::Prices(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl PayloadKind for Vec<FinancialStatement> {
    fn into_payload(self) -> Payload {
        Payload::Financials(self)
    }

    fn from_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::Financials(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl PayloadKind for Vec<NewsArticle> {
    fn into_payload(self) -> Payload {
        Payload::News(self)
    }

    fn from_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::News(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl PayloadKind for Overview {
    fn into_payload(self) -> Payload {
        Payload::Overview(self)
    }

    fn from_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::Overview(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl PayloadKind for Payload {
    fn into_payload(self) -> Payload {
        self
    }

    fn from_payload(payload: &Payload) -> Option<Self> {
        Some(payload.clone())
    }
}

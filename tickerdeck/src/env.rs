use std::sync::Arc;

use tickerdeck_core::{Credentials, TickerdeckConfig, TickerdeckError};
use tickerdeck_providers::ConnectorFactory;

use crate::Tickerdeck;

impl Tickerdeck {
    /// Orchestrator over reqwest-backed connectors configured from the process
    /// environment.
    ///
    /// Reads `PRICE_PROVIDER`, `FINANCIAL_PROVIDER`, `NEWS_PROVIDER`,
    /// `OVERVIEW_PROVIDER` and the vendor API keys. Vendors whose key is unset
    /// are skipped with a warning; their capability falls to whatever the
    /// build rules leave.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unknown provider name, `Connector` if the
    /// HTTP client cannot be built, and a skipped vendor's `Configuration`
    /// error when no connector could be built at all.
    pub fn from_env() -> Result<Self, TickerdeckError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// [`Tickerdeck::from_env`] over an arbitrary environment-style lookup.
    ///
    /// # Errors
    /// See [`Tickerdeck::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TickerdeckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = TickerdeckConfig::from_lookup(&lookup)?;
        let credentials = Credentials::from_lookup(&lookup);
        let factory = ConnectorFactory::from_config(&config)?;
        Self::with_factory(&factory, &config, &credentials)
    }

    /// Build the connectors `config.routing` names through `factory`.
    ///
    /// # Errors
    /// Returns a skipped vendor's error when no connector could be built.
    pub fn with_factory(
        factory: &ConnectorFactory,
        config: &TickerdeckConfig,
        credentials: &Credentials,
    ) -> Result<Self, TickerdeckError> {
        let (connectors, skipped) = factory.for_routing(config, credentials);
        if connectors.is_empty()
            && let Some(first) = skipped.into_iter().next()
        {
            return Err(first);
        }
        connectors
            .into_iter()
            .fold(Self::builder(), |b, c| b.with_connector(c))
            .config(config)
            .breakers(Arc::clone(factory.breakers()))
            .build()
    }
}

/// Generate a typed router method that resolves the capability's route,
/// consults the cache, and calls one provider method per attempt.
///
/// Notes:
/// - Every extra argument must be `Copy`; each attempt gets its own copy.
/// - `kind` builds the `DataKind` the result is cached under.
/// - `capability` is the label used when a routed connector stops
///   advertising the accessor between build and call.
macro_rules! tickerdeck_router_method {
    (
        $(#[$meta:meta])*
        method: $name:ident( $ticker:ident $(, $arg_ident:ident : $arg_ty:ty )* ) -> $ret:ty,
        accessor: $accessor:ident,
        capability: $capability:literal,
        kind: $kind:expr,
        call: $call_name:ident( $( $call_arg:ident ),* )
    ) => {
        $(#[$meta])*
        #[cfg_attr(
            feature = "tracing",
            tracing::instrument(
                target = "tickerdeck::router",
                skip(self, $ticker),
                fields(ticker = %$ticker),
            )
        )]
        ///
        /// # Errors
        /// Returns `Unsupported` when no connector serves the capability, the
        /// primary's error when it is not fallback-eligible or there is no
        /// secondary, and otherwise the secondary's error.
        pub async fn $name(
            &self,
            $ticker: &tickerdeck_core::Ticker,
            $( $arg_ident: $arg_ty ),*
        ) -> tickerdeck_core::FetchOutcome<$ret> {
            self.fetch_routed($ticker, $kind, move |c| {
                let c = std::sync::Arc::clone(c);
                tickerdeck_core::Attempt::new(c.key(), move || async move {
                    match c.$accessor() {
                        Some(p) => p.$call_name($ticker $(, $call_arg )*).await,
                        None => Err(tickerdeck_core::TickerdeckError::connector(
                            c.name(),
                            concat!("missing ", $capability, " capability during call"),
                        )),
                    }
                })
            })
            .await
        }
    };
}

pub(crate) use tickerdeck_router_method;

pub mod fetch;
pub mod financials;
pub mod macros;
pub mod news;
pub mod overview;
pub mod prices;

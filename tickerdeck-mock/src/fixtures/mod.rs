pub mod fundamentals;
pub mod news;
pub mod prices;

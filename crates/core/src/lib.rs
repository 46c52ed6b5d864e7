pub mod errors;
pub mod filter;
pub mod models;
pub mod notices;
pub mod schedule;

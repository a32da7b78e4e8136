//! examkit-core: exam model, answer scoring, and attempt history.
//!
//! This crate holds the scoring engine and everything it persists. Storage is
//! reached through the [`traits::KeyValueStore`] trait so the same engine runs
//! against the on-disk store or an in-memory one in tests.

pub mod answers;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod report;
pub mod repository;
pub mod results;
pub mod session;
pub mod statistics;
pub mod store;
pub mod timing;
pub mod traits;

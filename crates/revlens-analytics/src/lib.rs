//! # revlens-analytics
//!
//! Read-side aggregation over a sentiment index and its aligned records.
//! Everything is recomputed per call; nothing is cached.
//!
//! Degraded entries count as neutral with compound 0. Pending entries are left
//! out of every aggregate and reported separately.

pub mod statistics;
pub mod trends;

pub use statistics::{compute_statistics, LabelDistribution, ReviewExtreme, Statistics};
pub use trends::{compute_trends, MonthlyTrend};

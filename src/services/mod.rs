//! The metric pipeline, written against `MetricStore` so it runs the same
//! over Postgres and the in-memory store.

pub mod export;
pub mod metrics;
pub mod narrative;
pub mod summary;

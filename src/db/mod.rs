//! Persistence: the Postgres pool, repositories, and the `MetricStore` seam
//! the metric services are written against.

mod pool;

pub mod metrics;
pub mod users;

#[cfg(test)]
pub mod memory;

pub use metrics::{MetricRepository, MetricStore};
pub use pool::create_pool;

/// Message reported when a second entry for the same (owner, day) is rejected.
pub const DUPLICATE_DAY_MESSAGE: &str = "An entry already exists for this date";

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

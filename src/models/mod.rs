pub mod metric;
pub mod user;

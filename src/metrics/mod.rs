// Sprint health metrics
// Pure aggregation of normalized issue records into category scores

pub mod aggregator;
pub mod types;

pub use aggregator::{aggregate, MetricsAggregator};
pub use types::*;

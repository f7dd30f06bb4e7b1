pub mod aggregator;

pub use aggregator::{GroupStats, StatsSummary, summarize};

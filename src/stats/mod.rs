//! Stats module - aggregations behind the dashboard views

mod aggregator;

pub use aggregator::{
    Aggregator, CategoryShare, CountryDistribution, GlobalAverage, RankLabel, RankedMetric,
    RankedPair, ViewError, DEFAULT_TOP_N,
};

pub mod analyzer;
pub mod api_server;
pub mod collector;
pub mod config;
pub mod error;
pub mod logging;
pub mod market_client;
pub mod models;
pub mod normalizer;
pub mod query;
pub mod rate_limit;
pub mod ranker;
pub mod selector;
pub mod store;

// Re-exports for convenience
pub use analyzer::{AnalysisData, Analyzer};
pub use collector::{Collector, SkipReason, TickerOutcome};
pub use error::AnalysisError;
pub use market_client::{MarketData, PolygonClient};
pub use models::{
    AggBar, CollectorSummary, OptionContract, OptionRecord, QuoteSnapshot, QuoteStatus,
    RankedOption,
};
pub use query::{QueryState, SnapshotQuery};
pub use rate_limit::{FixedDelay, NoDelay, RateLimiter};
pub use selector::select_contract;
pub use store::SnapshotStore;

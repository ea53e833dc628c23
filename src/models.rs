use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// -----------------------------------------------
// PROVIDER PAYLOADS
// -----------------------------------------------

/// One daily aggregate bar as the provider reports it. Every numeric field
/// may be absent in thin sessions and defaults to zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggBar {
    #[serde(rename = "o", default)]
    pub open: f64,

    #[serde(rename = "h", default)]
    pub high: f64,

    #[serde(rename = "l", default)]
    pub low: f64,

    #[serde(rename = "c", default)]
    pub close: f64,

    #[serde(rename = "v", default)]
    pub volume: f64,

    #[serde(rename = "vw", default)]
    pub vwap: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggsResponse {
    #[serde(default)]
    pub results: Vec<AggBar>,
}

impl AggsResponse {
    /// The session bar, if the provider returned one.
    pub fn first_bar(&self) -> Option<&AggBar> {
        self.results.first()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionContract {
    pub ticker: String,

    #[serde(default)]
    pub underlying_ticker: String,

    pub strike_price: f64,

    pub expiration_date: NaiveDate,

    #[serde(default)]
    pub contract_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractsResponse {
    #[serde(default)]
    pub results: Vec<OptionContract>,
}

// -----------------------------------------------
// QUOTE SNAPSHOT
// -----------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    NoPricingData,
    Error,
}

/// Last-session pricing attached to a selected contract. A populated quote
/// carries no status; a degraded one carries only the status marker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    #[serde(default)]
    pub open: f64,

    #[serde(default)]
    pub high: f64,

    #[serde(default)]
    pub low: f64,

    #[serde(default)]
    pub close: f64,

    #[serde(default)]
    pub volume: u64,

    #[serde(default)]
    pub vwap: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<QuoteStatus>,
}

impl QuoteSnapshot {
    pub fn from_bar(bar: &AggBar) -> Self {
        Self {
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume.max(0.0) as u64,
            vwap: bar.vwap,
            status: None,
        }
    }

    pub fn no_pricing_data() -> Self {
        Self {
            status: Some(QuoteStatus::NoPricingData),
            ..Self::default()
        }
    }

    pub fn degraded() -> Self {
        Self {
            status: Some(QuoteStatus::Error),
            ..Self::default()
        }
    }
}

// -----------------------------------------------
// PERSISTED RECORD
// -----------------------------------------------

/// The unit written to the snapshot store: one selected call contract for
/// one ticker, with its quote fields flattened alongside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionRecord {
    pub underlying_ticker: String,
    pub current_price: f64,
    pub strike: f64,
    pub expiration: NaiveDate,
    pub contract_ticker: String,
    pub timestamp: DateTime<Utc>,

    #[serde(flatten)]
    pub quote: QuoteSnapshot,
}

// -----------------------------------------------
// ANALYSIS OUTPUT
// -----------------------------------------------

/// Analysis-time shape of a record: coerced numerics plus the derived
/// profit score. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedOption {
    pub underlying_ticker: String,
    pub current_price: f64,
    pub strike: f64,
    pub option_price: f64,
    pub volume: u64,
    pub contract_ticker: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub vwap: f64,
    pub profit_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectorSummary {
    pub message: String,
    pub total_options: usize,
    pub timestamp: DateTime<Utc>,
}

use std::time::Duration;

// -----------------------------------------------
// POLYGON API ENDPOINTS
// -----------------------------------------------
pub const POLYGON_BASE_URL: &str = "https://api.polygon.io";

pub fn prev_day_url(ticker: &str) -> String {
    format!(
        "{}/v2/aggs/ticker/{}/prev",
        POLYGON_BASE_URL,
        urlencoding::encode(ticker) // contract ids contain ':'
    )
}

pub fn day_range_url(ticker: &str, date: &str) -> String {
    format!(
        "{}/v2/aggs/ticker/{}/range/1/day/{}/{}",
        POLYGON_BASE_URL,
        urlencoding::encode(ticker),
        date,
        date
    )
}

pub fn contracts_url(underlying: &str, limit: usize) -> String {
    format!(
        "{}/v3/reference/options/contracts?underlying_ticker={}&contract_type=call&limit={}",
        POLYGON_BASE_URL,
        urlencoding::encode(underlying),
        limit
    )
}

// -----------------------------------------------
// TICKER UNIVERSE
// -----------------------------------------------
pub const MAGNIFICENT_SEVEN: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "TSLA", "META",
];

pub const CONTRACT_LISTING_LIMIT: usize = 1000;

// -----------------------------------------------
// HTTP CLIENT CONFIG
// -----------------------------------------------
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub const PRICE_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const CONTRACTS_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const QUOTE_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// -----------------------------------------------
// RETRY CONFIG
// -----------------------------------------------
pub const RETRY_BASE_DELAY_MS: u64 = 200;
pub const RETRY_FACTOR: u64 = 3;
pub const RETRY_MAX_DELAY_SECS: u64 = 5;
pub const RETRY_MAX_ATTEMPTS: usize = 3;

// -----------------------------------------------
// RATE-LIMIT PAUSES
// -----------------------------------------------
// The free Polygon tier allows a handful of requests per minute; the
// collector stays sequential and sleeps between calls instead of fanning out.
pub const TICKER_PAUSE: Duration = Duration::from_secs(2);
pub const QUOTE_PAUSE: Duration = Duration::from_secs(1);

// -----------------------------------------------
// SNAPSHOT STORAGE
// -----------------------------------------------
pub const SNAPSHOT_BUCKET: &str = "faang-options";
pub const SNAPSHOT_PREFIX: &str = "magnificent-seven-options";

/// Object key for one collection run, truncated to the minute so each run
/// gets a distinct, time-sortable identity.
pub fn snapshot_key(at: chrono::DateTime<chrono::Utc>) -> String {
    format!("{}/{}.json", SNAPSHOT_PREFIX, at.format("%Y-%m-%d-%H-%M"))
}

// -----------------------------------------------
// ANALYTICS QUERY CONFIG
// -----------------------------------------------
pub const ATHENA_DATABASE: &str = "options_analytics";
pub const ATHENA_OUTPUT_LOCATION: &str = "s3://faang-options/athena-results/";
pub const DATA_SOURCE_LABEL: &str = "AWS Athena";

// Most recent 7 persisted records, newest first. The warehouse stores each
// snapshot as a records array, hence the UNNEST.
pub const RECENT_OPTIONS_SQL: &str = "\
SELECT
  option.underlying_ticker,
  option.current_price,
  option.strike,
  option.close as option_price,
  option.volume,
  option.contract_ticker,
  option.open,
  option.high,
  option.low,
  option.vwap,
  option.timestamp
FROM magnificent_seven_options
CROSS JOIN UNNEST(records) AS t(option)
ORDER BY option.timestamp DESC
LIMIT 7";

pub const QUERY_POLL_MAX_ATTEMPTS: usize = 3;
pub const QUERY_POLL_DELAY: Duration = Duration::from_secs(2);

pub const TOP_OPTIONS_COUNT: usize = 3;

// -----------------------------------------------
// RUNTIME CONFIGURATION
// -----------------------------------------------

/// Get the Polygon API key; required for any collector run.
pub fn get_api_key() -> anyhow::Result<String> {
    std::env::var("POLYGON_API_KEY")
        .map_err(|_| anyhow::anyhow!("POLYGON_API_KEY environment variable not set"))
}

/// Get the execution mode from environment or default to collect
pub fn get_execution_mode() -> String {
    std::env::var("OPTIONS_MODE").unwrap_or_else(|_| "collect".to_string())
}

/// Get port for server mode
pub fn get_port() -> u16 {
    std::env::var("OPTIONS_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or(3001)
}

use std::fmt;

/// Failure categories the analyzer reports to its caller. No-data, a query
/// that terminates unsuccessfully, and an exhausted poll budget are distinct
/// outcomes and must not be conflated.
#[derive(Debug)]
pub enum AnalysisError {
    NoData,
    QueryFailed(String),
    Timeout,
    Internal(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AnalysisError::NoData => write!(f, "No options data found"),
            AnalysisError::QueryFailed(reason) => write!(f, "Query failed: {}", reason),
            AnalysisError::Timeout => write!(f, "Query timeout"),
            AnalysisError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<anyhow::Error> for AnalysisError {
    fn from(err: anyhow::Error) -> Self {
        AnalysisError::Internal(err.to_string())
    }
}

use crate::config;
use crate::error::AnalysisError;
use crate::models::RankedOption;
use crate::normalizer;
use crate::query::{QueryState, SnapshotQuery};
use crate::ranker;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Successful analysis payload handed to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisData {
    pub top_options: Vec<RankedOption>,
    pub query_execution_id: String,
    pub data_source: String,
}

pub struct Analyzer {
    query: Arc<dyn SnapshotQuery>,
}

impl Analyzer {
    pub fn new(query: Arc<dyn SnapshotQuery>) -> Self {
        Self { query }
    }

    /// Submit the fixed recent-records query, wait for it within the poll
    /// budget, then normalize, dedupe, and rank the result rows.
    pub async fn run(&self) -> Result<AnalysisData, AnalysisError> {
        let execution_id = self.query.start_query(config::RECENT_OPTIONS_SQL).await?;
        info!(%execution_id, "Started analytics query");

        self.wait_for_completion(&execution_id).await?;

        let rows = self.query.fetch_rows(&execution_id).await?;
        if rows.is_empty() {
            return Err(AnalysisError::NoData);
        }
        info!(rows = rows.len(), "Fetched result rows");

        let records = normalizer::parse_rows(&rows);
        let deduped = normalizer::dedupe_by_contract(records);
        let top_options = ranker::rank_top(deduped, config::TOP_OPTIONS_COUNT);

        Ok(AnalysisData {
            top_options,
            query_execution_id: execution_id,
            data_source: config::DATA_SOURCE_LABEL.to_string(),
        })
    }

    /// Bounded wait: a fixed number of status checks with a fixed delay in
    /// between, ending in an explicit timeout rather than blocking forever.
    async fn wait_for_completion(&self, execution_id: &str) -> Result<(), AnalysisError> {
        for _ in 0..config::QUERY_POLL_MAX_ATTEMPTS {
            match self.query.query_state(execution_id).await? {
                QueryState::Succeeded => return Ok(()),
                QueryState::Failed(reason) => {
                    error!(execution_id, %reason, "Analytics query failed");
                    return Err(AnalysisError::QueryFailed(reason));
                }
                QueryState::Running => {}
            }

            tokio::time::sleep(config::QUERY_POLL_DELAY).await;
        }

        Err(AnalysisError::Timeout)
    }
}

use crate::config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_athena::types::{
    QueryExecutionContext, QueryExecutionState, ResultConfiguration,
};

/// Observed state of a submitted query. Failed carries the engine's stated
/// reason; cancelled executions report as Failed too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState {
    Running,
    Succeeded,
    Failed(String),
}

/// Analytics query capability the analyzer consumes: submit, poll, fetch.
#[async_trait]
pub trait SnapshotQuery: Send + Sync {
    async fn start_query(&self, sql: &str) -> Result<String>;

    async fn query_state(&self, execution_id: &str) -> Result<QueryState>;

    /// First-column values of the result set, header row dropped. An empty
    /// vec means the query succeeded but matched nothing.
    async fn fetch_rows(&self, execution_id: &str) -> Result<Vec<String>>;
}

pub struct AthenaQueryEngine {
    client: aws_sdk_athena::Client,
    database: String,
    output_location: String,
}

impl AthenaQueryEngine {
    pub fn new(
        client: aws_sdk_athena::Client,
        database: impl Into<String>,
        output_location: impl Into<String>,
    ) -> Self {
        Self {
            client,
            database: database.into(),
            output_location: output_location.into(),
        }
    }

    pub async fn from_env() -> Self {
        let shared = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(
            aws_sdk_athena::Client::new(&shared),
            config::ATHENA_DATABASE,
            config::ATHENA_OUTPUT_LOCATION,
        )
    }
}

#[async_trait]
impl SnapshotQuery for AthenaQueryEngine {
    async fn start_query(&self, sql: &str) -> Result<String> {
        let started = self
            .client
            .start_query_execution()
            .query_string(sql)
            .query_execution_context(
                QueryExecutionContext::builder()
                    .database(&self.database)
                    .build(),
            )
            .result_configuration(
                ResultConfiguration::builder()
                    .output_location(&self.output_location)
                    .build(),
            )
            .send()
            .await
            .context("Failed to start query execution")?;

        started
            .query_execution_id()
            .map(str::to_string)
            .context("Query execution id missing from response")
    }

    async fn query_state(&self, execution_id: &str) -> Result<QueryState> {
        let resp = self
            .client
            .get_query_execution()
            .query_execution_id(execution_id)
            .send()
            .await
            .context("Failed to get query execution")?;

        let status = resp
            .query_execution()
            .and_then(|q| q.status())
            .context("Query execution status missing from response")?;

        let state = match status.state() {
            Some(QueryExecutionState::Succeeded) => QueryState::Succeeded,
            Some(QueryExecutionState::Failed) | Some(QueryExecutionState::Cancelled) => {
                QueryState::Failed(
                    status
                        .state_change_reason()
                        .unwrap_or("Query failed")
                        .to_string(),
                )
            }
            _ => QueryState::Running,
        };

        Ok(state)
    }

    async fn fetch_rows(&self, execution_id: &str) -> Result<Vec<String>> {
        let resp = self
            .client
            .get_query_results()
            .query_execution_id(execution_id)
            .send()
            .await
            .context("Failed to get query results")?;

        let rows = resp
            .result_set()
            .map(|set| set.rows())
            .unwrap_or_default();

        // First row is the column header.
        let values = rows
            .iter()
            .skip(1)
            .map(|row| {
                row.data()
                    .first()
                    .and_then(|datum| datum.var_char_value())
                    .unwrap_or_default()
                    .to_string()
            })
            .collect();

        Ok(values)
    }
}

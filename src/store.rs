use crate::config;
use crate::models::OptionRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

/// Durable write target for collection batches. One key, one immutable
/// object; new runs write new keys.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn put_snapshot(&self, key: &str, records: &[OptionRecord]) -> Result<()>;
}

pub struct S3SnapshotStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3SnapshotStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Client from the ambient AWS environment, default bucket.
    pub async fn from_env() -> Self {
        let shared = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_s3::Client::new(&shared), config::SNAPSHOT_BUCKET)
    }
}

#[async_trait]
impl SnapshotStore for S3SnapshotStore {
    async fn put_snapshot(&self, key: &str, records: &[OptionRecord]) -> Result<()> {
        let body = serde_json::to_vec(records).context("Failed to serialize snapshot")?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type("application/json")
            .send()
            .await
            .with_context(|| format!("Failed to store snapshot at {}", key))?;

        Ok(())
    }
}

//! Queues marginal outcomes for human review.
//!
//! A record is written only when confidence sits below the review threshold.
//! Storage failures are logged and swallowed.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use thiserror::Error;
use tracing::{error, info};

use crate::models::feedback::FeedbackRecord;
use crate::models::profile::CandidateProfile;
use crate::pipeline::redaction::{PiiRedactor, RedactionLevel};

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("object store error: {0}")]
    ObjectStore(String),
}

/// Durable storage for one JSON record per key.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn persist(&self, key: &str, record: &FeedbackRecord) -> Result<(), FeedbackError>;
}

/// One pretty-printed `<key>.json` file per record.
pub struct FileFeedbackStore {
    dir: PathBuf,
}

impl FileFeedbackStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl FeedbackStore for FileFeedbackStore {
    async fn persist(&self, key: &str, record: &FeedbackRecord) -> Result<(), FeedbackError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let body = serde_json::to_vec_pretty(record)?;
        tokio::fs::write(self.dir.join(format!("{key}.json")), body).await?;
        Ok(())
    }
}

pub struct S3FeedbackStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
}

impl S3FeedbackStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, prefix: String) -> Self {
        Self {
            client,
            bucket,
            prefix,
        }
    }
}

#[async_trait]
impl FeedbackStore for S3FeedbackStore {
    async fn persist(&self, key: &str, record: &FeedbackRecord) -> Result<(), FeedbackError> {
        let body = serde_json::to_vec_pretty(record)?;
        let object_key = format!("{}{}.json", self.prefix, key);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .body(ByteStream::from(body))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| FeedbackError::ObjectStore(format!("{e:?}")))?;
        Ok(())
    }
}

pub struct FeedbackSink {
    store: Arc<dyn FeedbackStore>,
    threshold: f64,
    redactor: PiiRedactor,
    level: RedactionLevel,
}

impl FeedbackSink {
    pub fn new(
        store: Arc<dyn FeedbackStore>,
        threshold: f64,
        redactor: PiiRedactor,
        level: RedactionLevel,
    ) -> Self {
        Self {
            store,
            threshold,
            redactor,
            level,
        }
    }

    /// Stores a review record when `confidence` is below the threshold.
    /// Returns whether a record was written.
    pub async fn capture(
        &self,
        document_ref: &str,
        profile: &CandidateProfile,
        confidence: f64,
    ) -> bool {
        if confidence >= self.threshold {
            return false;
        }

        let record = FeedbackRecord::new(
            document_ref.to_string(),
            confidence,
            self.redactor.redact(profile, self.level),
        );
        let key = record.storage_key();

        match self.store.persist(&key, &record).await {
            Ok(()) => {
                info!(
                    "Queued {} for review (confidence={:.3}, key={})",
                    document_ref, confidence, key
                );
                true
            }
            Err(e) => {
                error!("Failed to store feedback for {}: {}", document_ref, e);
                false
            }
        }
    }
}

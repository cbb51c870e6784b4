//! Transport abstraction between the uploaders and the advertising API.
//!
//! Request flags (`validate_only` and `partial_failure`) are passed with every
//! mutate call. The transport keeps no flag state between calls, so
//! concurrent uploads on one service cannot see each other's flags.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api_error::RawApiError;
use crate::errors::AdsError;
use crate::operations::Operation;
use crate::selector::{ReportDefinition, Selector};

/// Request flags sent along with a mutate call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportFlags {
    /// Validate operations without applying them.
    pub validate_only: bool,
    /// Apply valid operations even if others in the request fail.
    pub partial_failure: bool,
}

/// Response of a mutate call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateResult {
    #[serde(default)]
    pub value: Vec<Value>,
    #[serde(default)]
    pub partial_failure_errors: Vec<RawApiError>,
}

/// One page of a `get` call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub total_num_entries: usize,
    #[serde(default)]
    pub entries: Vec<Value>,
}

/// Freshly created batch job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchJob {
    pub id: i64,
    pub upload_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchJobStatus {
    AwaitingFile,
    Active,
    Canceling,
    Canceled,
    Done,
}

impl BatchJobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, BatchJobStatus::Done | BatchJobStatus::Canceled)
    }
}

/// Status snapshot of a batch job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchJobProgress {
    pub id: i64,
    pub status: BatchJobStatus,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Outcome of one operation of a batch job.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub index: usize,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub errors: Vec<RawApiError>,
}

/// Calls the uploaders and the service façade need from the API.
#[async_trait]
pub trait AdsTransport: Send + Sync {
    async fn mutate(
        &self,
        service: &str,
        operations: &[Operation],
        flags: TransportFlags,
    ) -> Result<MutateResult, AdsError>;

    async fn mutate_label(
        &self,
        service: &str,
        operations: &[Operation],
        flags: TransportFlags,
    ) -> Result<MutateResult, AdsError>;

    // Calls below go out with default flags.
    async fn get(&self, service: &str, selector: &Selector) -> Result<Page, AdsError>;

    async fn create_batch_job(&self) -> Result<BatchJob, AdsError>;

    async fn upload_batch_operations(
        &self,
        job: &BatchJob,
        operations: &[Operation],
    ) -> Result<(), AdsError>;

    async fn batch_job_status(&self, job_id: i64) -> Result<BatchJobProgress, AdsError>;

    async fn batch_job_results(&self, download_url: &str) -> Result<Vec<BatchResult>, AdsError>;

    /// Returns the raw CSV body of the report.
    async fn download_report(
        &self,
        definition: &ReportDefinition,
        include_zero_impressions: bool,
    ) -> Result<String, AdsError>;
}

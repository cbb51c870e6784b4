use std::fmt;
use std::time::Duration;

use crate::api_error::NormalizedError;
use crate::transport::{BatchResult, MutateResult};

/// Shown when a label operation went through the plain mutate call.
pub const IS_LABEL_DIAGNOSTIC: &str =
    "Please use 'is_label' parameter for uploading label operations with standard upload.";

/// Shown when a batch upload is requested in debug mode.
pub const BATCH_DEBUG_DIAGNOSTIC: &str =
    "Batch jobs cannot validate operations. Nothing was submitted in debug mode.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadMethod {
    #[default]
    Standard,
    Batch,
}

/// Options for [`crate::service::AdsService::upload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// Validate only, nothing is applied.
    pub is_debug: bool,
    pub method: UploadMethod,
    /// Required for standard uploads, ignored by batch uploads.
    pub service_name: Option<String>,
    pub is_label: bool,
    /// Batch only: wait for the job and report failed operations.
    pub report_on_results: bool,
    /// Batch only: overrides the configured poll interval.
    pub batch_sleep_interval: Option<Duration>,
    /// Standard only.
    pub partial_failure: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            is_debug: false,
            method: UploadMethod::Standard,
            service_name: None,
            is_label: false,
            report_on_results: true,
            batch_sleep_interval: None,
            partial_failure: true,
        }
    }
}

impl UploadOptions {
    pub fn standard(service_name: &str) -> Self {
        Self {
            service_name: Some(service_name.to_string()),
            ..Default::default()
        }
    }

    pub fn batch() -> Self {
        Self {
            method: UploadMethod::Batch,
            ..Default::default()
        }
    }

    pub fn debug(mut self, is_debug: bool) -> Self {
        self.is_debug = is_debug;
        self
    }

    pub fn label(mut self, is_label: bool) -> Self {
        self.is_label = is_label;
        self
    }

    pub fn report_on_results(mut self, report: bool) -> Self {
        self.report_on_results = report;
        self
    }

    pub fn batch_sleep_interval(mut self, interval: Duration) -> Self {
        self.batch_sleep_interval = Some(interval);
        self
    }

    pub fn partial_failure(mut self, partial_failure: bool) -> Self {
        self.partial_failure = partial_failure;
        self
    }
}

/// Raw payload returned by the API for an upload.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadPayload {
    Mutate(MutateResult),
    /// Batch job submitted without waiting for its results.
    BatchSubmitted { job_id: i64 },
    BatchResults { job_id: i64, results: Vec<BatchResult> },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadResult {
    pub payload: Option<UploadPayload>,
    pub errors: Vec<NormalizedError>,
    pub diagnostic: Option<String>,
}

impl UploadResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && self.diagnostic.is_none()
    }

    /// Writes the outcome to the log, one line per failed operation.
    pub(crate) fn log_summary(&self, is_debug: bool) {
        if let Some(diagnostic) = &self.diagnostic {
            tracing::warn!("{}", diagnostic);
        } else if self.errors.is_empty() {
            if !is_debug {
                tracing::info!("All operations successfully uploaded.");
            }
        } else {
            for error in &self.errors {
                tracing::warn!("{}", error);
            }
        }
    }
}

impl fmt::Display for UploadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(diagnostic) = &self.diagnostic {
            return write!(f, "{}", diagnostic);
        }
        if self.errors.is_empty() {
            return write!(f, "All operations successfully uploaded.");
        }
        let lines = self
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>();
        write!(f, "{}", lines.join("\n"))
    }
}

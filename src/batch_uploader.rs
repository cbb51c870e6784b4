//! Batch job uploads.
//!
//! A batch job accepts any number of operations across services. Entities
//! created in the same job reference each other through temp ids, which this
//! uploader hands out and resets once the job has been executed.

use std::time::Duration;

use crate::api_error::NormalizedError;
use crate::errors::{AdsError, ResultExt};
use crate::operations::Operation;
use crate::retry::RetryPolicy;
use crate::temp_id::{TempId, TempIdAllocator};
use crate::transport::{AdsTransport, BatchJob, BatchJobProgress, BatchJobStatus, BatchResult};
use crate::upload::{UploadPayload, UploadResult, BATCH_DEBUG_DIAGNOSTIC};

pub struct BatchUploader<'a, T: AdsTransport + ?Sized> {
    transport: &'a T,
    retry: &'a RetryPolicy,
    is_debug: bool,
    report_on_results: bool,
    sleep_interval: Duration,
    max_polls: u32,
    temp_ids: TempIdAllocator,
}

impl<'a, T: AdsTransport + ?Sized> BatchUploader<'a, T> {
    pub fn new(
        transport: &'a T,
        retry: &'a RetryPolicy,
        is_debug: bool,
        report_on_results: bool,
        sleep_interval: Duration,
        max_polls: u32,
    ) -> Self {
        Self {
            transport,
            retry,
            is_debug,
            report_on_results,
            sleep_interval,
            max_polls: max_polls.max(1),
            temp_ids: TempIdAllocator::new(),
        }
    }

    pub fn next_temp_id(&mut self) -> TempId {
        self.temp_ids.next_id()
    }

    /// Keeps `id` when present, otherwise allocates the next temp id.
    pub fn fill_temp_id(&mut self, id: Option<i64>) -> i64 {
        self.temp_ids.fill(id)
    }

    /// Submits `operations` as one batch job.
    pub async fn execute(&mut self, operations: &[Operation]) -> Result<UploadResult, AdsError> {
        // Temp ids only live within one job.
        self.temp_ids.reset();

        if operations.is_empty() {
            tracing::info!("No operations to upload");
            return Ok(UploadResult::default());
        }

        if self.is_debug {
            tracing::warn!(
                "Debug mode: batch job with {} operations not submitted",
                operations.len()
            );
            return Ok(UploadResult {
                payload: None,
                errors: Vec::new(),
                diagnostic: Some(BATCH_DEBUG_DIAGNOSTIC.to_string()),
            });
        }

        let transport = self.transport;
        let job = self
            .retry
            .run_default("create batch job", || transport.create_batch_job())
            .await
            .context("creating batch job")?;

        self.retry
            .run_default("upload batch operations", || {
                transport.upload_batch_operations(&job, operations)
            })
            .await
            .with_context(|| format!("uploading operations to batch job {}", job.id))?;

        tracing::info!(
            "Batch job {} submitted with {} operations",
            job.id,
            operations.len()
        );

        if !self.report_on_results {
            return Ok(UploadResult {
                payload: Some(UploadPayload::BatchSubmitted { job_id: job.id }),
                errors: Vec::new(),
                diagnostic: None,
            });
        }

        let progress = self.wait_for_job(&job).await?;
        let download_url = progress.download_url.ok_or_else(|| {
            AdsError::BatchJob(format!("batch job {} finished without results", job.id))
        })?;

        let results = self
            .retry
            .run_default("download batch results", || {
                transport.batch_job_results(&download_url)
            })
            .await
            .with_context(|| format!("downloading results of batch job {}", job.id))?;

        let result = UploadResult {
            errors: failed_operations(&results),
            payload: Some(UploadPayload::BatchResults {
                job_id: job.id,
                results,
            }),
            diagnostic: None,
        };
        result.log_summary(self.is_debug);
        Ok(result)
    }

    /// Polls the job until it is DONE, CANCELED, or polls run out.
    async fn wait_for_job(&self, job: &BatchJob) -> Result<BatchJobProgress, AdsError> {
        let transport = self.transport;

        for poll in 1..=self.max_polls {
            let progress = self
                .retry
                .run_default("poll batch job", || transport.batch_job_status(job.id))
                .await
                .with_context(|| format!("polling batch job {}", job.id))?;

            match progress.status {
                BatchJobStatus::Done => {
                    tracing::info!("Batch job {} done after {} polls", job.id, poll);
                    return Ok(progress);
                }
                BatchJobStatus::Canceled => {
                    return Err(AdsError::BatchJob(format!(
                        "batch job {} was canceled",
                        job.id
                    )));
                }
                status => {
                    tracing::debug!(
                        "Batch job {} is {:?} (poll {}/{})",
                        job.id,
                        status,
                        poll,
                        self.max_polls
                    );
                }
            }

            if poll < self.max_polls {
                tokio::time::sleep(self.sleep_interval).await;
            }
        }

        Err(AdsError::BatchJob(format!(
            "batch job {} not finished after {} polls",
            job.id, self.max_polls
        )))
    }
}

fn failed_operations(results: &[BatchResult]) -> Vec<NormalizedError> {
    results
        .iter()
        .flat_map(|result| {
            result
                .errors
                .iter()
                .map(move |error| NormalizedError::from_api_error(result.index, error))
        })
        .collect()
}

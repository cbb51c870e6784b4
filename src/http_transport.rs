use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api_error::RawApiError;
use crate::config::Config;
use crate::errors::AdsError;
use crate::operations::Operation;
use crate::selector::{ReportDefinition, Selector};
use crate::transport::{
    AdsTransport, BatchJob, BatchJobProgress, BatchResult, MutateResult, Page, TransportFlags,
};

#[derive(Debug, Deserialize)]
struct FaultEnvelope {
    fault: Fault,
}

#[derive(Debug, Deserialize)]
struct Fault {
    #[serde(default)]
    message: String,
    #[serde(default)]
    detail: Option<FaultDetail>,
}

#[derive(Debug, Deserialize)]
struct FaultDetail {
    #[serde(default)]
    errors: Vec<RawApiError>,
}

#[derive(Serialize)]
struct OperationsBody<'a> {
    operations: &'a [Operation],
}

/// JSON-over-HTTP transport for the advertising API.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    developer_token: String,
    access_token: String,
    client_customer_id: Option<String>,
}

impl HttpTransport {
    /// Creates a new `HttpTransport` from the API settings in `config`.
    pub fn new(config: &Config) -> Result<Self, AdsError> {
        url::Url::parse(&config.api_base_url).map_err(|e| {
            AdsError::Config(format!(
                "invalid API base url {}: {}",
                config.api_base_url, e
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AdsError::Config(format!("Failed to create API client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            developer_token: config.developer_token.clone(),
            access_token: config.access_token.clone(),
            client_customer_id: config.client_customer_id.clone(),
        })
    }

    /// Same transport, acting on behalf of another client account.
    pub fn with_client_customer_id(mut self, customer_id: &str) -> Self {
        self.client_customer_id = Some(customer_id.to_string());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Adds authentication and the flags of this request.
    fn authorize(&self, request: RequestBuilder, flags: TransportFlags) -> RequestBuilder {
        let request = request
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("developerToken", &self.developer_token)
            .header("validateOnly", flags.validate_only.to_string())
            .header("partialFailure", flags.partial_failure.to_string());

        match &self.client_customer_id {
            Some(customer_id) => request.header("clientCustomerId", customer_id),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, AdsError> {
        self.send_with_flags(request, TransportFlags::default())
            .await
    }

    async fn send_with_flags(
        &self,
        request: RequestBuilder,
        flags: TransportFlags,
    ) -> Result<Response, AdsError> {
        let response = self.authorize(request, flags).send().await?;
        check_response(response).await
    }

    async fn send_json<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R, AdsError> {
        self.send_json_with_flags(request, TransportFlags::default())
            .await
    }

    async fn send_json_with_flags<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        flags: TransportFlags,
    ) -> Result<R, AdsError> {
        let response = self.send_with_flags(request, flags).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| AdsError::Parse(format!("Failed to parse API response: {}", e)))
    }

    async fn post_operations(
        &self,
        service: &str,
        method: &str,
        operations: &[Operation],
        flags: TransportFlags,
    ) -> Result<MutateResult, AdsError> {
        let url = self.url(&format!("{}/{}", service, method));
        tracing::info!(
            "Sending {} operations to {} (validate_only: {})",
            operations.len(),
            url,
            flags.validate_only
        );

        self.send_json_with_flags(
            self.client.post(&url).json(&OperationsBody { operations }),
            flags,
        )
        .await
    }
}

/// Maps non-success responses onto the error taxonomy.
async fn check_response(response: Response) -> Result<Response, AdsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    if status.as_u16() == 429 {
        return Err(AdsError::RateLimited(body));
    }

    if let Ok(envelope) = serde_json::from_str::<FaultEnvelope>(&body) {
        tracing::debug!("API fault ({}): {}", status, envelope.fault.message);
        return Err(AdsError::ApiFault {
            message: envelope.fault.message,
            detail: envelope.fault.detail.map(|d| d.errors),
        });
    }

    Err(AdsError::Http {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl AdsTransport for HttpTransport {
    async fn mutate(
        &self,
        service: &str,
        operations: &[Operation],
        flags: TransportFlags,
    ) -> Result<MutateResult, AdsError> {
        self.post_operations(service, "mutate", operations, flags)
            .await
    }

    async fn mutate_label(
        &self,
        service: &str,
        operations: &[Operation],
        flags: TransportFlags,
    ) -> Result<MutateResult, AdsError> {
        self.post_operations(service, "mutateLabel", operations, flags)
            .await
    }

    async fn get(&self, service: &str, selector: &Selector) -> Result<Page, AdsError> {
        let url = self.url(&format!("{}/get", service));
        tracing::debug!("Fetching page from {}", url);

        self.send_json(self.client.post(&url).json(&json!({ "selector": selector })))
            .await
    }

    async fn create_batch_job(&self) -> Result<BatchJob, AdsError> {
        let url = self.url("BatchJobService/create");
        let job: BatchJob = self.send_json(self.client.post(&url)).await?;
        tracing::info!("Created batch job {}", job.id);
        Ok(job)
    }

    async fn upload_batch_operations(
        &self,
        job: &BatchJob,
        operations: &[Operation],
    ) -> Result<(), AdsError> {
        tracing::info!(
            "Uploading {} operations to batch job {}",
            operations.len(),
            job.id
        );
        self.send(
            self.client
                .put(&job.upload_url)
                .json(&OperationsBody { operations }),
        )
        .await?;
        Ok(())
    }

    async fn batch_job_status(&self, job_id: i64) -> Result<BatchJobProgress, AdsError> {
        let url = self.url("BatchJobService/status");
        self.send_json(self.client.post(&url).json(&json!({ "id": job_id })))
            .await
    }

    async fn batch_job_results(&self, download_url: &str) -> Result<Vec<BatchResult>, AdsError> {
        tracing::debug!("Downloading batch job results from {}", download_url);
        self.send_json(self.client.get(download_url)).await
    }

    async fn download_report(
        &self,
        definition: &ReportDefinition,
        include_zero_impressions: bool,
    ) -> Result<String, AdsError> {
        let url = self.url("reportdownload");
        tracing::info!("Downloading {} report", definition.report_type);

        let response = self
            .send(
                self.client
                    .post(&url)
                    .header(
                        "includeZeroImpressions",
                        include_zero_impressions.to_string(),
                    )
                    .header("skipReportHeader", "true")
                    .header("skipReportSummary", "true")
                    .json(definition),
            )
            .await?;

        Ok(response.text().await?)
    }
}

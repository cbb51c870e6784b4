//! Entry point for uploads, downloads and reports.

use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;

use crate::account::{Account, ManagedCustomer};
use crate::batch_uploader::BatchUploader;
use crate::config::Config;
use crate::errors::{AdsError, ResultExt};
use crate::http_transport::HttpTransport;
use crate::operations::Operation;
use crate::report::Report;
use crate::retry::RetryPolicy;
use crate::selector::{
    report_definition_at, Predicate, ReportDefinition, ReportRequest, Selector, SortOrder,
};
use crate::standard_uploader::StandardUploader;
use crate::transport::{AdsTransport, Page};
use crate::upload::{UploadMethod, UploadOptions, UploadResult};

/// Entries requested per `get` call.
pub const PAGE_SIZE: usize = 500;

pub const ACCOUNT_FIELDS: [&str; 7] = [
    "Name",
    "CustomerId",
    "AccountLabels",
    "CanManageClients",
    "CurrencyCode",
    "DateTimeZone",
    "TestAccount",
];

pub struct AdsService<T: AdsTransport = HttpTransport> {
    transport: T,
    retry: RetryPolicy,
    batch_sleep_interval: Duration,
    batch_max_polls: u32,
    label_ids: Cache<String, i64>,
}

impl AdsService<HttpTransport> {
    pub fn from_config(config: &Config) -> Result<Self, AdsError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(transport, RetryPolicy::from_config(config)).with_batch_polling(
            Duration::from_secs(config.batch_sleep_secs),
            config.batch_max_polls,
        ))
    }
}

impl<T: AdsTransport> AdsService<T> {
    pub fn new(transport: T, retry: RetryPolicy) -> Self {
        let label_ids = Cache::builder()
            .time_to_live(Duration::from_secs(3600))
            .max_capacity(10_000)
            .build();

        Self {
            transport,
            retry,
            batch_sleep_interval: Duration::from_secs(15),
            batch_max_polls: 40,
            label_ids,
        }
    }

    /// Default poll interval and poll limit of batch uploads.
    pub fn with_batch_polling(mut self, sleep_interval: Duration, max_polls: u32) -> Self {
        self.batch_sleep_interval = sleep_interval;
        self.batch_max_polls = max_polls;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn standard_uploader(
        &self,
        is_debug: bool,
        partial_failure: bool,
    ) -> StandardUploader<'_, T> {
        StandardUploader::new(&self.transport, &self.retry, is_debug, partial_failure)
    }

    /// Batch uploader; `sleep_interval` falls back to the configured one.
    pub fn batch_uploader(
        &self,
        is_debug: bool,
        report_on_results: bool,
        sleep_interval: Option<Duration>,
    ) -> BatchUploader<'_, T> {
        BatchUploader::new(
            &self.transport,
            &self.retry,
            is_debug,
            report_on_results,
            sleep_interval.unwrap_or(self.batch_sleep_interval),
            self.batch_max_polls,
        )
    }

    /// Uploads `operations` with the method chosen in `options`.
    pub async fn upload(
        &self,
        operations: &[Operation],
        options: &UploadOptions,
    ) -> Result<UploadResult, AdsError> {
        match options.method {
            UploadMethod::Standard => {
                self.standard_uploader(options.is_debug, options.partial_failure)
                    .execute(operations, options.service_name.as_deref(), options.is_label)
                    .await
            }
            UploadMethod::Batch => {
                if let Some(service) = &options.service_name {
                    tracing::debug!("Batch upload ignores service name {}", service);
                }
                self.batch_uploader(
                    options.is_debug,
                    options.report_on_results,
                    options.batch_sleep_interval,
                )
                .execute(operations)
                .await
            }
        }
    }

    /// Selector over all accounts below the authenticated manager account.
    pub fn account_selector(predicates: Vec<Predicate>, skip_mccs: bool) -> Selector {
        let mut predicates = predicates;
        if skip_mccs {
            predicates.push(Predicate::equals("CanManageClients", "FALSE"));
        }

        Selector::new(ACCOUNT_FIELDS)
            .with_predicates(predicates)
            .order_by("Name", SortOrder::Ascending)
    }

    pub async fn get_page(&self, selector: &Selector, service: &str) -> Result<Page, AdsError> {
        let transport = &self.transport;
        self.retry
            .run_default("get page", || transport.get(service, selector))
            .await
            .with_context(|| format!("fetching page from {}", service))
    }

    /// Downloads every entry matching `selector`, page by page.
    pub async fn get_all(&self, selector: &Selector, service: &str) -> Result<Vec<Value>, AdsError> {
        let mut entries = Vec::new();
        let mut start_index = 0;

        loop {
            let page = self
                .get_page(&selector.page(start_index, PAGE_SIZE), service)
                .await?;
            let received = page.entries.len();
            entries.extend(page.entries);
            start_index += PAGE_SIZE;

            if received == 0 || start_index >= page.total_num_entries {
                break;
            }
        }

        tracing::debug!("Downloaded {} entries from {}", entries.len(), service);
        Ok(entries)
    }

    pub async fn download_objects(
        &self,
        service: &str,
        fields: &[&str],
        predicates: Vec<Predicate>,
    ) -> Result<Vec<Value>, AdsError> {
        let selector = Selector::new(fields.iter().copied()).with_predicates(predicates);
        self.get_all(&selector, service).await
    }

    /// All accounts visible to the configured manager account.
    pub async fn accounts(
        &self,
        predicates: Vec<Predicate>,
        skip_mccs: bool,
    ) -> Result<Vec<Account>, AdsError> {
        let selector = Self::account_selector(predicates, skip_mccs);
        let entries = self.get_all(&selector, "ManagedCustomerService").await?;

        let accounts = entries
            .into_iter()
            .map(|entry| {
                serde_json::from_value::<ManagedCustomer>(entry).map(Account::from_managed_customer)
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!("Found {} accounts", accounts.len());
        Ok(accounts)
    }

    /// Report definition with dates resolved against today's date.
    pub fn report_definition(&self, request: &ReportRequest) -> Result<ReportDefinition, AdsError> {
        report_definition_at(request, chrono::Local::now().date_naive())
    }

    pub async fn download_report(
        &self,
        definition: &ReportDefinition,
        include_zero_impressions: bool,
    ) -> Result<Report, AdsError> {
        let transport = &self.transport;
        let body = self
            .retry
            .run_default("download report", || {
                transport.download_report(definition, include_zero_impressions)
            })
            .await
            .with_context(|| format!("downloading {}", definition.report_type))?;

        Report::from_csv(&body)
    }

    /// Id of the label called `name`, if it exists.
    pub async fn label_id(&self, name: &str) -> Result<Option<i64>, AdsError> {
        if let Some(id) = self.label_ids.get(name).await {
            return Ok(Some(id));
        }

        let entries = self
            .download_objects(
                "LabelService",
                &["LabelId", "LabelName"],
                vec![Predicate::equals("LabelName", name)],
            )
            .await?;

        let id = entries
            .iter()
            .find_map(|entry| entry.get("id").and_then(Value::as_i64));

        if let Some(id) = id {
            self.remember_label_id(name, id).await;
        }
        Ok(id)
    }

    pub(crate) async fn remember_label_id(&self, name: &str, id: i64) {
        self.label_ids.insert(name.to_string(), id).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_selector_skips_mccs() {
        let selector = AdsService::<HttpTransport>::account_selector(Vec::new(), true);
        assert_eq!(
            serde_json::to_value(&selector).unwrap(),
            json!({
                "fields": [
                    "Name", "CustomerId", "AccountLabels", "CanManageClients",
                    "CurrencyCode", "DateTimeZone", "TestAccount"
                ],
                "predicates": [
                    {"field": "CanManageClients", "operator": "EQUALS", "values": ["FALSE"]}
                ],
                "ordering": [{"field": "Name", "sortOrder": "ASCENDING"}]
            })
        );
    }

    #[test]
    fn test_account_selector_without_predicates() {
        let selector = AdsService::<HttpTransport>::account_selector(Vec::new(), false);
        let value = serde_json::to_value(&selector).unwrap();
        assert!(value.get("predicates").is_none());
    }
}

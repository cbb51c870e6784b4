use crate::api_error::NormalizedError;
use crate::errors::AdsError;
use crate::operations::Operation;
use crate::retry::RetryPolicy;
use crate::transport::{AdsTransport, MutateResult, TransportFlags};
use crate::upload::{UploadPayload, UploadResult, IS_LABEL_DIAGNOSTIC};

/// Largest number of operations a single mutate call accepts.
pub const MAX_OPERATIONS_STANDARD_UPLOAD: usize = 5000;

/// Uploads operations with one synchronous mutate call.
pub struct StandardUploader<'a, T: AdsTransport + ?Sized> {
    transport: &'a T,
    retry: &'a RetryPolicy,
    is_debug: bool,
    partial_failure: bool,
}

impl<'a, T: AdsTransport + ?Sized> StandardUploader<'a, T> {
    pub fn new(
        transport: &'a T,
        retry: &'a RetryPolicy,
        is_debug: bool,
        partial_failure: bool,
    ) -> Self {
        Self {
            transport,
            retry,
            is_debug,
            partial_failure,
        }
    }

    /// Sends `operations` to `service_name`.
    ///
    /// Failed operations end up in [`UploadResult::errors`]; only precondition
    /// and transport failures are returned as errors.
    pub async fn execute(
        &self,
        operations: &[Operation],
        service_name: Option<&str>,
        is_label: bool,
    ) -> Result<UploadResult, AdsError> {
        if operations.len() > MAX_OPERATIONS_STANDARD_UPLOAD {
            return Err(AdsError::TooManyOperations {
                count: operations.len(),
                max: MAX_OPERATIONS_STANDARD_UPLOAD,
            });
        }
        let service = service_name.ok_or(AdsError::MissingServiceName)?;

        if operations.iter().any(|op| op.is_label() != is_label) {
            tracing::warn!(
                "Operations for {} mix label and non-label operations (is_label = {})",
                service,
                is_label
            );
        }

        tracing::info!("##### OperationUpload is LIVE: {}. #####", !self.is_debug);

        let result = match self.upload(operations, service, is_label).await {
            Ok(response) => {
                let errors = if self.is_debug {
                    Vec::new()
                } else {
                    NormalizedError::from_api_errors(&response.partial_failure_errors)
                };
                UploadResult {
                    payload: Some(UploadPayload::Mutate(response)),
                    errors,
                    diagnostic: None,
                }
            }
            Err(AdsError::ApiFault {
                detail: Some(errors),
                ..
            }) => UploadResult {
                payload: None,
                errors: NormalizedError::from_api_errors(&errors),
                diagnostic: None,
            },
            Err(AdsError::ApiFault {
                message,
                detail: None,
            }) => {
                tracing::debug!("Fault without detail: {}", message);
                UploadResult {
                    payload: None,
                    errors: Vec::new(),
                    diagnostic: Some(IS_LABEL_DIAGNOSTIC.to_string()),
                }
            }
            Err(err) => return Err(err),
        };

        result.log_summary(self.is_debug);
        Ok(result)
    }

    /// Flags every mutate call of this uploader is sent with.
    pub fn flags(&self) -> TransportFlags {
        TransportFlags {
            validate_only: self.is_debug,
            partial_failure: self.partial_failure,
        }
    }

    async fn upload(
        &self,
        operations: &[Operation],
        service: &str,
        is_label: bool,
    ) -> Result<MutateResult, AdsError> {
        let transport = self.transport;
        let flags = self.flags();
        self.retry
            .run_default("mutate", || async move {
                if is_label {
                    transport.mutate_label(service, operations, flags).await
                } else {
                    transport.mutate(service, operations, flags).await
                }
            })
            .await
    }
}

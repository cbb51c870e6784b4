//! freedan
//!
//! Convenience layer over the advertising API: entities such as campaigns,
//! ad groups, keywords and labels are plain values that build typed mutate
//! operations, which are then sent with a standard or a batch upload.
//!
//! # Modules
//!
//! - `objects`: Entity models and their operation builders.
//! - `integrations`: Transport trait and HTTP implementation.
//! - `operations`: Typed operations and their wire representation.
//! - `service`: Upload dispatch, account listing, object and report download.
//! - `standard_uploader` / `batch_uploader`: The two upload paths.
//! - `retry`: Retry policy with exponential backoff.
//! - `selector`: Selectors and report definitions.
//! - `errors` / `api_error`: Error taxonomy and normalized operation errors.
//! - `config`: Configuration from the environment.
//!
//! # Example
//!
//! ```no_run
//! use freedan::config::Config;
//! use freedan::keyword::{Keyword, KeywordFinalUrl};
//! use freedan::operations::Status;
//! use freedan::service::AdsService;
//! use freedan::upload::UploadOptions;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let service = AdsService::from_config(&Config::from_env()?)?;
//! let url = KeywordFinalUrl::new("https://shop.example.com/shoes")?;
//! let keyword = Keyword::new("red shoes", "EXACT", 0.5, url)?;
//! let operations = vec![keyword.add_operation(42, Status::Paused, None)?];
//!
//! let result = service
//!     .upload(&operations, &UploadOptions::standard("AdGroupCriterionService").debug(true))
//!     .await?;
//! println!("{}", result);
//! # Ok(())
//! # }
//! ```

pub mod integrations;
pub mod objects;

pub mod account;
pub mod adgroup;
pub mod api_error;
pub mod batch_uploader;
pub mod campaign;
pub mod campaign_budget;
pub mod config;
pub mod errors;
pub mod extended_text_ad;
pub mod http_transport;
pub mod keyword;
pub mod label;
pub mod money;
pub mod negative_keyword;
pub mod operations;
pub mod report;
pub mod retry;
pub mod selector;
pub mod service;
pub mod shared_set;
pub mod standard_uploader;
pub mod temp_id;
pub mod transport;
pub mod upload;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub developer_token: String,
    pub access_token: String,
    pub client_customer_id: Option<String>,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub batch_sleep_secs: u64,
    pub batch_max_polls: u32,
    pub http_timeout_secs: u64,
}

fn required(name: &str) -> anyhow::Result<String> {
    std::env::var(name)
        .map_err(|_| anyhow::anyhow!("{} environment variable required", name))
        .and_then(|value| {
            if value.trim().is_empty() {
                anyhow::bail!("{} cannot be empty", name);
            }
            Ok(value)
        })
}

fn number<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number", name)),
        _ => Ok(default),
    }
}

impl Config {
    /// Configuration with default retry and polling settings.
    pub fn new(api_base_url: &str, developer_token: &str, access_token: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            developer_token: developer_token.to_string(),
            access_token: access_token.to_string(),
            client_customer_id: None,
            max_retries: 3,
            retry_base_delay_ms: 1000,
            batch_sleep_secs: 15,
            batch_max_polls: 40,
            http_timeout_secs: 60,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url = required("ADS_API_BASE_URL").and_then(|url| {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("ADS_API_BASE_URL must start with http:// or https://");
            }
            url::Url::parse(&url)
                .map_err(|e| anyhow::anyhow!("ADS_API_BASE_URL is not a valid URL: {}", e))?;
            Ok(url)
        })?;

        let mut config = Self::new(
            &api_base_url,
            &required("ADS_DEVELOPER_TOKEN")?,
            &required("ADS_ACCESS_TOKEN")?,
        );

        config.client_customer_id = std::env::var("ADS_CLIENT_CUSTOMER_ID")
            .ok()
            .filter(|s| !s.trim().is_empty());
        config.max_retries = number("ADS_MAX_RETRIES", config.max_retries)?;
        config.retry_base_delay_ms = number("ADS_RETRY_BASE_DELAY_MS", config.retry_base_delay_ms)?;
        config.batch_sleep_secs = number("ADS_BATCH_SLEEP_SECS", config.batch_sleep_secs)?;
        config.batch_max_polls = number("ADS_BATCH_MAX_POLLS", config.batch_max_polls)?;
        config.http_timeout_secs = number("ADS_HTTP_TIMEOUT_SECS", config.http_timeout_secs)?;

        if config.max_retries == 0 {
            anyhow::bail!("ADS_MAX_RETRIES must be at least 1");
        }

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("API Base URL: {}", config.api_base_url);
        if let Some(ref customer) = config.client_customer_id {
            tracing::info!("Client customer configured: {}", customer);
        }
        tracing::debug!(
            "Retries: {} (base delay {}ms), batch polling: every {}s up to {} times",
            config.max_retries,
            config.retry_base_delay_ms,
            config.batch_sleep_secs,
            config.batch_max_polls
        );

        Ok(config)
    }
}

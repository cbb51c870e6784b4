//! Lists the accounts below the configured manager account.
//!
//! Usage: `list_accounts [--skip-mccs] [--label NAME]`

use freedan::config::Config;
use freedan::service::AdsService;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "freedan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let skip_mccs = args.iter().any(|a| a == "--skip-mccs");
    let label = args
        .iter()
        .position(|a| a == "--label")
        .and_then(|i| args.get(i + 1))
        .cloned();

    let config = Config::from_env()?;
    let service = AdsService::from_config(&config)?;

    let accounts = service.accounts(Vec::new(), skip_mccs).await?;
    for account in accounts
        .iter()
        .filter(|a| label.as_deref().map_or(true, |l| a.has_label(l)))
    {
        let labels = account
            .labels
            .as_ref()
            .map(|labels| {
                labels
                    .iter()
                    .map(|l| l.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        println!("{}\t{}", account, labels);
    }

    Ok(())
}

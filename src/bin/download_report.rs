//! Downloads a report and prints it as tab separated rows.
//!
//! Usage: `download_report REPORT_TYPE FIELD[,FIELD...] [LAST_DAYS]`

use anyhow::Context;
use freedan::config::Config;
use freedan::selector::ReportRequest;
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

    let mut args = std::env::args().skip(1);
    let report_type = args
        .next()
        .context("usage: download_report REPORT_TYPE FIELDS [LAST_DAYS]")?;
    let fields = args.next().context("missing comma separated field list")?;

    let mut request = ReportRequest::new(
        &report_type,
        fields.split(',').map(str::trim).filter(|f| !f.is_empty()),
    );
    if let Some(days) = args.next() {
        let days: u32 = days.parse().context("LAST_DAYS must be a number")?;
        request = request.last_days(days);
    }

    let config = Config::from_env()?;
    let service = AdsService::from_config(&config)?;

    let definition = service.report_definition(&request)?;
    let report = service.download_report(&definition, false).await?;

    println!("{}", report.columns.join("\t"));
    for row in &report.rows {
        println!("{}", row.join("\t"));
    }
    tracing::info!("{} rows", report.rows.len());

    Ok(())
}

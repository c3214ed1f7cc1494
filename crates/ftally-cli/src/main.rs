mod identifiers;

use ftally_scraper::{fetch_all, BatchPolicy, ProfileClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ftally_core::load_scraper_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let identifiers = identifiers::from_env();
    let policy = BatchPolicy::from_config(&config)?;
    let client = ProfileClient::new(&config)?;

    tracing::info!(
        count = identifiers.len(),
        base_url = %config.profile_base_url,
        "collecting follower counts"
    );
    let records = fetch_all(&client, &identifiers, &policy).await;

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

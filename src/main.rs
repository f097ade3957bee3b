use std::{net::TcpListener, sync::Arc, time::Duration};

use anyhow::Context;
use env_logger::Env;
use prospect::{
    configuration::get_configuration,
    services::{BatchProcessor, OpenaiClient, RecordEnricher, TavilyClient},
    startup::run,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration.")?;

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;

    let tavily_client = TavilyClient::new(
        configuration.api_keys.tavily,
        &configuration.search.base_url,
        Duration::from_secs(configuration.search.timeout_seconds),
    )
    .context("Failed to build search client.")?;
    let openai_client = OpenaiClient::new(
        configuration.api_keys.openai,
        &configuration.extraction.api_base,
        configuration.extraction.model,
        Duration::from_secs(configuration.extraction.timeout_seconds),
    );

    let batch_processor = BatchProcessor::new(RecordEnricher::new(
        Arc::new(tavily_client),
        Arc::new(openai_client),
    ));

    log::info!("Listening on {}", address);
    run(
        listener,
        batch_processor,
        configuration.application.max_upload_bytes,
    )?
    .await?;

    Ok(())
}

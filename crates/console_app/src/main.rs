mod config;
mod logging;
mod runner;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    logging::initialize(logging::LogDestination::Both);
    let config = config::ClientConfig::load(std::path::Path::new("console.ron"));
    runner::run(config).await
}

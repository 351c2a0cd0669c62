use anyhow::Result;

use meter_consolidator::api::{init_tracing, serve};
use meter_consolidator::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = AppConfig::from_env()?;
    serve(config).await
}

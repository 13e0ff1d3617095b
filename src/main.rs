use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use postbox::config::Config;
use postbox::store::{MongoStore, Store};
use postbox::{api, logging, Server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logging::init(config.log_format);

    let store = MongoStore::connect(&config.mongo_uri, &config.database).await?;
    match store.ping().await {
        Ok(()) => info!(database = %config.database, "mongodb reachable"),
        Err(e) => warn!(database = %config.database, "mongodb not reachable yet: {e}"),
    }

    let app = api::routes(Arc::new(store));
    Server::bind(config.listen).await?.serve(app).await?;
    Ok(())
}

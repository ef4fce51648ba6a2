use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use tarpc::client;
use tarpc::tokio_serde::formats::Json;
use tracing::info;

use bookinfo::books_csv::read_books_file;
use bookinfo::config::ClientArgs;
use bookinfo::demo::{upload, walkthrough};
use bookinfo::logging::init_logging;
use bookinfo::BookInfoClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = ClientArgs::parse();
    init_logging(args.json_logs);

    info!(address = %args.address, "connecting");
    let transport = tarpc::serde_transport::tcp::connect(args.address, Json::default)
        .await
        .with_context(|| format!("did not connect to {}", args.address))?;
    let client = BookInfoClient::new(client::Config::default(), transport).spawn();
    let timeout = Duration::from_secs(args.timeout_secs);

    walkthrough(&client, timeout).await?;

    if let Some(path) = &args.csv {
        let books = read_books_file(path)?;
        info!(path = %path.display(), count = books.len(), "uploading books");
        upload(&client, books, timeout).await?;
    }
    Ok(())
}

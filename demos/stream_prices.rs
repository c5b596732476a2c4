use std::time::Duration;

use dflow_rs::websocket::{StreamClient, StreamConfig};
use dflow_rs::ClientConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ClientConfig::from_env()?;
    let client = StreamClient::new(
        StreamConfig::new(config.resolved_ws_url()).with_reconnect_interval(Duration::from_secs(2)),
    );

    let _prices = client.on_price(|update| {
        println!(
            "[price] {:<32} yes={:.2} no={:.2}",
            update.ticker, update.yes_price, update.no_price
        );
    });
    let _trades = client.on_trade(|trade| {
        println!(
            "[trade] {:<32} {} {} @ {:.2}",
            trade.ticker,
            trade.side.as_str(),
            trade.quantity,
            trade.price
        );
    });
    let _errors = client.on_error(|err| eprintln!("Stream error: {}", err));
    let _closed = client.on_close(|| eprintln!("Stream closed, reconnecting..."));

    println!("Connecting to {}...", client.config().url);
    client.connect().await?;

    // Tickers on the command line, or everything
    let tickers: Vec<String> = std::env::args().skip(1).collect();
    if tickers.is_empty() {
        client.subscribe_all_prices().await?;
        client.subscribe_all_trades().await?;
    } else {
        client.subscribe_prices(tickers.clone()).await?;
        client.subscribe_trades(tickers).await?;
    }

    println!("Waiting for updates, Ctrl-C to stop\n");
    tokio::signal::ctrl_c().await?;

    client.disconnect().await;
    println!("Stream ended.");
    Ok(())
}

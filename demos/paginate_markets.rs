use dflow_rs::{ClientConfig, DFlowClient, MarketStatus, MarketsParams, RetryPolicy};
use futures_util::StreamExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,dflow_rs=debug")),
        )
        .init();

    // DFLOW_ENVIRONMENT / DFLOW_API_KEY select the deployment
    let client = DFlowClient::new(ClientConfig::from_env()?)?;

    // Single page, retried on rate limiting and server errors
    let active = MarketsParams::new().with_status(MarketStatus::Active);
    let first = RetryPolicy::default()
        .run(|| client.markets().get_markets(&active))
        .await?;
    println!("First page: {} markets, next cursor {:?}", first.markets.len(), first.cursor);

    // Walk pages lazily until 100 markets were seen
    let markets = client
        .markets()
        .paginate_markets(active)
        .page_size(25)
        .max_items(100)
        .into_stream();
    futures_util::pin_mut!(markets);

    let mut count = 0;
    while let Some(market) = markets.next().await {
        let market = market?;
        count += 1;
        println!(
            "[{:>3}] {:<32} yes={:<6} no={:<6} {}",
            count,
            market.ticker,
            market.yes_bid.as_deref().unwrap_or("-"),
            market.no_bid.as_deref().unwrap_or("-"),
            market.title
        );
    }

    // Find the first settled market
    let settled = client
        .markets()
        .paginate_markets(MarketsParams::new())
        .find_first(|m| m.status.is_settled())
        .await?;
    match settled {
        Some(market) => println!("First settled market: {} ({:?})", market.ticker, market.result),
        None => println!("No settled markets found"),
    }

    Ok(())
}

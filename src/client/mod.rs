//! REST endpoint wrappers, one client per resource, plus the [`DFlowClient`] facade.

mod dflow;
mod events;
mod live_data;
mod markets;
mod orderbook;
mod orders;
mod proof;
mod search;
mod series;
mod swap;
mod tokens;
mod trades;

pub use dflow::DFlowClient;
pub use events::EventsClient;
pub use live_data::LiveDataClient;
pub use markets::MarketsClient;
pub use orderbook::OrderbookClient;
pub use orders::OrdersClient;
pub use proof::ProofClient;
pub use search::SearchClient;
pub use series::SeriesClient;
pub use swap::{IntentClient, SwapClient};
pub use tokens::{PredictionMarketClient, TokensClient};
pub use trades::TradesClient;

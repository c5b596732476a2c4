mod common;
mod events;
mod ledger;
mod live_data;
mod markets;
mod orderbook;
mod orders;
mod proof;
mod search;
mod series;
mod stream;
mod tokens;
mod trades;

// Re-export all types
pub use common::*;
pub use events::*;
pub use ledger::*;
pub use live_data::*;
pub use markets::*;
pub use orderbook::*;
pub use orders::*;
pub use proof::*;
pub use search::*;
pub use series::*;
pub use stream::*;
pub use tokens::*;
pub use trades::*;

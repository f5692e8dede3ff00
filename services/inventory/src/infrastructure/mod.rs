pub mod brewery_client;
pub mod downstream;
pub mod notification_client;

pub use brewery_client::BreweryApiClient;
pub use notification_client::HttpLowStockNotifier;

//! External collaborators: market data sources and notification channels.

pub mod email;
pub mod market_data;
pub mod notifier;
pub mod telegram;
pub mod yahoo;

pub use market_data::{InMemoryMarketDataProvider, MarketDataProvider};
pub use notifier::{DeliveryReport, DryRunNotifier, NotificationHub, Notifier};
pub use yahoo::YahooChartProvider;

pub mod app_state;
pub mod broadcast_hub;
pub mod connection_config;
pub mod connection_id;
pub mod connection_limits;
pub mod durable_log;
pub mod error;
pub mod metrics;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod subscriber;
pub mod subscriber_registry;
pub mod web_socket_connection;

pub use app_state::{AppState, handler};
pub use broadcast_hub::BroadcastHub;
pub use connection_config::ConnectionConfig;
pub use connection_id::ConnectionId;
pub use connection_limits::ConnectionLimits;
pub use durable_log::{DurableLog, LoadStatus};
pub use error::{Result, WsError};
pub use metrics::Metrics;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use subscriber::Subscriber;
pub use subscriber_registry::SubscriberRegistry;
pub use web_socket_connection::{WebSocketConnection, WebSocketSubscriber};

#[cfg(test)]
mod tests;

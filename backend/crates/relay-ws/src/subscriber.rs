use crate::{ConnectionId, Result as WsErrorResult};

use relay_core::Record;

use async_trait::async_trait;

/// A live connection the hub can push records to.
///
/// Transport adapters implement this; the hub never sees sockets.
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Identity used as the registry key
    fn id(&self) -> ConnectionId;

    /// Deliver one record. Implementations must bound how long this waits.
    async fn send(&self, record: &Record) -> WsErrorResult<()>;

    /// Ask the transport to tear the connection down.
    fn close(&self);
}

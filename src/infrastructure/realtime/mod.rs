mod queue_change_stream;
mod websocket_manager;

pub use queue_change_stream::{ChangeSource, ChangeSubscription, QueueChangeStream, parse_change};
pub use websocket_manager::{
  ConnectionClosed, DUPLICATE_CONNECTION_CODE, DUPLICATE_CONNECTION_REASON, SHUTDOWN_CODE,
  SHUTDOWN_REASON, WebsocketManager, WsConnection,
};

#[cfg(test)]
pub(crate) use websocket_manager::tests::{Event, FakeConnection};

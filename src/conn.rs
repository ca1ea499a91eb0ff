use std::any::Any;
use std::io;
use std::time::Duration;

use http::{Request, Response};

use crate::{Error, SharedContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Active,
    Closing,
    Closed,
}

/// Event interest control for a non-blocking connection.
///
/// Suspending an interest stops the corresponding readiness events from
/// firing until it is requested again. Both calls are idempotent.
pub trait IoControl {
    fn request_input(&mut self);
    fn suspend_input(&mut self);
    fn request_output(&mut self);
    fn suspend_output(&mut self);
}

/// The capability set a non-blocking HTTP/1.x client connection offers to
/// the protocol handler.
///
/// The connection owns the socket, the wire codec and the readiness
/// bookkeeping. The protocol handler only ever sees parsed message heads
/// and the streaming encoder/decoder handed to it with each event.
pub trait ClientConnection: IoControl {
    /// The attribute bag shared between the connection, the protocol
    /// handler and the caller.
    fn context(&self) -> &SharedContext;

    /// Enqueue a request head for transmission.
    fn submit_request(&mut self, request: &Request<()>) -> Result<(), Error>;

    /// Discard any pending outbound body bytes.
    fn reset_output(&mut self);

    /// Discard any remaining inbound body bytes.
    fn reset_input(&mut self);

    /// The idle timeout of the underlying socket. `Duration::ZERO` means no
    /// timeout is in effect.
    fn socket_timeout(&self) -> Duration;

    fn set_socket_timeout(&mut self, timeout: Duration);

    /// Hand over the most recently parsed response head.
    fn take_response(&mut self) -> Option<Response<()>>;

    fn status(&self) -> ConnectionStatus;

    /// Close gracefully, flushing what is pending.
    fn close(&mut self) -> io::Result<()>;

    /// Tear down immediately.
    fn shutdown(&mut self) -> io::Result<()>;
}

/// Streaming sink for request body bytes, owned by the connection and
/// borrowed by the handler for the duration of one writable event.
pub trait ContentEncoder {
    fn write(&mut self, src: &[u8]) -> io::Result<usize>;

    /// Mark the outgoing body as finished. Must be called exactly once.
    fn complete(&mut self) -> io::Result<()>;

    fn is_completed(&self) -> bool;
}

/// Streaming source of response body bytes, the read-side counterpart of
/// [`ContentEncoder`].
pub trait ContentDecoder {
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize>;

    fn is_completed(&self) -> bool;
}

/// The event seam between the reactor and the protocol handler.
///
/// The reactor delivers events for a given connection serially and in
/// arrival order. Fallible callbacks report fatal conditions by returning
/// `Err`; the reactor must route such an error back into [`exception`] on
/// the same connection.
///
/// [`exception`]: ClientEventHandler::exception
pub trait ClientEventHandler {
    /// The connection is established. `attachment` is whatever object the
    /// caller supplied when initiating the connect.
    fn connected(
        &self,
        conn: &mut dyn ClientConnection,
        attachment: Option<Box<dyn Any + Send>>,
    ) -> Result<(), Error>;

    /// The connection can accept a new request head.
    fn request_ready(&self, conn: &mut dyn ClientConnection) -> Result<(), Error>;

    /// The connection can accept request body bytes.
    fn output_ready(
        &self,
        conn: &mut dyn ClientConnection,
        encoder: &mut dyn ContentEncoder,
    ) -> Result<(), Error>;

    /// A response head has been parsed off the wire.
    fn response_received(&self, conn: &mut dyn ClientConnection) -> Result<(), Error>;

    /// Response body bytes are available.
    fn input_ready(
        &self,
        conn: &mut dyn ClientConnection,
        decoder: &mut dyn ContentDecoder,
    ) -> Result<(), Error>;

    /// The socket idle timeout elapsed.
    fn timeout(&self, conn: &mut dyn ClientConnection) -> Result<(), Error>;

    /// A fatal error occurred while processing an event.
    fn exception(&self, conn: &mut dyn ClientConnection, cause: Error);

    /// The connection is gone.
    fn closed(&self, conn: &mut dyn ClientConnection);
}

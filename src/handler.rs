use std::io;

use http::{Request, Response};

use crate::conn::{ContentDecoder, ContentEncoder, IoControl};
use crate::{Error, SharedContext};

/// Caller-supplied driver of one or more request/response exchanges on a
/// single connection.
///
/// The protocol handler adopts an exchange handler from the connection
/// context, owns it exclusively while an exchange is in flight and invokes
/// its callbacks in a fixed order: [`generate_request`], zero or more
/// [`produce_content`], [`request_completed`], [`response_received`], zero
/// or more [`consume_content`], [`response_completed`]. On a fatal
/// condition the remainder of that sequence is replaced by one [`failed`]
/// followed by [`close`].
///
/// [`generate_request`]: ExchangeHandler::generate_request
/// [`produce_content`]: ExchangeHandler::produce_content
/// [`request_completed`]: ExchangeHandler::request_completed
/// [`response_received`]: ExchangeHandler::response_received
/// [`consume_content`]: ExchangeHandler::consume_content
/// [`response_completed`]: ExchangeHandler::response_completed
/// [`failed`]: ExchangeHandler::failed
/// [`close`]: ExchangeHandler::close
pub trait ExchangeHandler: Send {
    /// Produce the next request head, or `None` to defer until a later
    /// readiness event.
    fn generate_request(&mut self) -> Result<Option<Request<()>>, Error>;

    /// Write the next chunk of request body to `encoder`. Call
    /// `encoder.complete()` exactly once when the body is finished. Use
    /// `ioctrl` to suspend output while no data is available.
    fn produce_content(
        &mut self,
        encoder: &mut dyn ContentEncoder,
        ioctrl: &mut dyn IoControl,
    ) -> io::Result<()>;

    /// The request head and body have been fully written.
    fn request_completed(&mut self);

    /// The final (non-1xx) response head arrived.
    fn response_received(&mut self, response: &Response<()>) -> Result<(), Error>;

    /// Read the next chunk of response body from `decoder`. Use `ioctrl`
    /// to suspend input while the handler cannot accept more.
    fn consume_content(
        &mut self,
        decoder: &mut dyn ContentDecoder,
        ioctrl: &mut dyn IoControl,
    ) -> io::Result<()>;

    /// The response body has been fully consumed; the exchange is over.
    fn response_completed(&mut self);

    /// Whether this handler has further exchanges to drive on the
    /// connection.
    fn is_done(&self) -> bool;

    /// The exchange aborted. Always followed by [`close`].
    ///
    /// [`close`]: ExchangeHandler::close
    fn failed(&mut self, err: &Error);

    /// Release handler-owned resources.
    fn close(&mut self);

    /// The per-exchange context shared with user code.
    fn context(&self) -> &SharedContext;

    fn reuse_strategy(&self) -> &dyn ReuseStrategy;
}

/// Decides whether the connection may serve another exchange once a
/// response has completed.
pub trait ReuseStrategy {
    fn keep_alive(&self, response: &Response<()>, ctx: &SharedContext) -> bool;
}

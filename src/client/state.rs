use std::fmt;
use std::time::Duration;

use http::{Request, Response};

use crate::ExchangeHandler;

/// Phase of one side (request or response) of an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageState {
    /// No message in flight on this side.
    Ready,
    /// Head submitted with `Expect: 100-continue`; output suspended until
    /// the server acknowledges or the wait elapses.
    AckExpected,
    /// `100 Continue` received; body streaming imminent.
    Ack,
    /// Body bytes are being written or read.
    BodyStream,
    /// This side is finished; awaiting the other side or a reset.
    Completed,
}

/// Mutable per-connection record of the exchange in flight.
///
/// Created once when the connection is established, mutated only by
/// [`ClientProtocolHandler`](super::ClientProtocolHandler) event callbacks
/// under the per-state mutex, reset after every completed exchange and
/// discarded when the connection closes.
pub(crate) struct ExchangeState {
    pub handler: Option<Box<dyn ExchangeHandler>>,
    pub request_state: MessageState,
    pub response_state: MessageState,
    pub request: Option<Request<()>>,
    pub response: Option<Response<()>>,
    pub saved_timeout: Duration,
    /// Latches `false` when the exchange can no longer leave the
    /// connection in a reusable condition. Never returns to `true`.
    pub valid: bool,
}

impl ExchangeState {
    pub fn new() -> Self {
        ExchangeState {
            handler: None,
            request_state: MessageState::Ready,
            response_state: MessageState::Ready,
            request: None,
            response: None,
            saved_timeout: Duration::ZERO,
            valid: true,
        }
    }

    /// Make the record ready for the next exchange. The validity flag is
    /// not restored: once latched invalid, the connection stays invalid.
    pub fn reset(&mut self) {
        self.response_state = MessageState::Ready;
        self.request_state = MessageState::Ready;
        self.response = None;
        self.request = None;
        self.handler = None;
        self.saved_timeout = Duration::ZERO;
    }
}

impl fmt::Debug for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request state: {:?}; request: ", self.request_state)?;
        if let Some(req) = &self.request {
            write!(f, "{} {}", req.method(), req.uri())?;
        }
        write!(f, "; response state: {:?}; response: ", self.response_state)?;
        if let Some(res) = &self.response {
            write!(f, "{}", res.status())?;
        }
        write!(f, "; valid: {};", self.valid)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reset_returns_both_sides_to_ready() {
        let mut st = ExchangeState::new();
        st.request_state = MessageState::Completed;
        st.response_state = MessageState::BodyStream;
        st.saved_timeout = Duration::from_secs(30);

        st.reset();

        assert_eq!(st.request_state, MessageState::Ready);
        assert_eq!(st.response_state, MessageState::Ready);
        assert_eq!(st.saved_timeout, Duration::ZERO);
        assert!(st.valid);
    }

    #[test]
    fn reset_does_not_clear_the_invalid_latch() {
        let mut st = ExchangeState::new();
        st.valid = false;

        st.reset();

        assert!(!st.valid);
    }

    #[test]
    fn debug_format_summarizes_exchange() {
        let mut st = ExchangeState::new();
        st.request = Some(Request::get("http://q.test/").body(()).unwrap());
        st.request_state = MessageState::Completed;

        assert_eq!(
            format!("{:?}", st),
            "request state: Completed; request: GET http://q.test/; \
             response state: Ready; response: ; valid: true;"
        );
    }
}

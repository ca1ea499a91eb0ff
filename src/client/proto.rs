use std::any::Any;
use std::sync::{Arc, Mutex};

use http::{Method, Request, Response, StatusCode};

use crate::conn::{
    ClientConnection, ClientEventHandler, ConnectionStatus, ContentDecoder, ContentEncoder,
};
use crate::context::{EXCHANGE_HANDLER, EXCHANGE_STATE};
use crate::ext::{HeaderIterExt, RequestExt};
use crate::{Error, ExchangeHandler};

use super::state::{ExchangeState, MessageState};
use super::{WaitForContinue, DEFAULT_WAIT_FOR_CONTINUE, GRACE_CLOSE_TIMEOUT};

/// Stateless dispatcher translating individual connection events into
/// logically related HTTP exchanges.
///
/// Only message heads are ever held in memory; body content streams
/// between the attached [`ExchangeHandler`] and the connection's content
/// encoder/decoder with a near constant footprint.
///
/// The caller starts an exchange sequence by storing a boxed
/// [`ExchangeHandler`] in the connection context under
/// [`EXCHANGE_HANDLER`](crate::EXCHANGE_HANDLER) and requesting
/// output readiness. The sequence is over once the handler reports
/// [`is_done`](ExchangeHandler::is_done).
#[derive(Debug, Default, Clone, Copy)]
pub struct ClientProtocolHandler;

impl ClientProtocolHandler {
    pub fn new() -> Self {
        ClientProtocolHandler
    }
}

impl ClientEventHandler for ClientProtocolHandler {
    fn connected(
        &self,
        conn: &mut dyn ClientConnection,
        _attachment: Option<Box<dyn Any + Send>>,
    ) -> Result<(), Error> {
        trace!("connected; installing exchange state");
        conn.context()
            .insert(EXCHANGE_STATE, Arc::new(Mutex::new(ExchangeState::new())));
        self.request_ready(conn)
    }

    fn request_ready(&self, conn: &mut dyn ClientConnection) -> Result<(), Error> {
        let state = ensure_state(conn)?;
        let mut state = state.lock().unwrap();
        let st = &mut *state;

        if st.request_state != MessageState::Ready {
            return Ok(());
        }
        if st.handler.as_ref().is_some_and(|h| h.is_done()) {
            close_handler(st);
            st.reset();
        }
        if st.handler.is_none() {
            st.handler = conn
                .context()
                .take::<Box<dyn ExchangeHandler>>(EXCHANGE_HANDLER);
            if st.handler.is_some() {
                trace!("adopted exchange handler from context");
            }
        }
        let Some(handler) = st.handler.as_mut() else {
            // Idle until the caller attaches a handler and requests output.
            return Ok(());
        };
        let Some(request) = handler.generate_request()? else {
            return Ok(());
        };

        debug!("submit request: {} {}", request.method(), request.uri());
        conn.submit_request(&request)?;

        if request.has_entity() {
            if request.headers().iter().has_expect_100() {
                st.saved_timeout = conn.socket_timeout();
                let wait = request
                    .extensions()
                    .get::<WaitForContinue>()
                    .map(|w| w.0)
                    .unwrap_or(DEFAULT_WAIT_FOR_CONTINUE);
                conn.set_socket_timeout(wait);
                st.request_state = MessageState::AckExpected;
            } else {
                st.request_state = MessageState::BodyStream;
            }
        } else {
            handler.request_completed();
            st.request_state = MessageState::Completed;
        }
        st.request = Some(request);
        Ok(())
    }

    fn output_ready(
        &self,
        conn: &mut dyn ClientConnection,
        encoder: &mut dyn ContentEncoder,
    ) -> Result<(), Error> {
        let state = ensure_state(conn)?;
        let mut state = state.lock().unwrap();
        let st = &mut *state;

        let Some(handler) = st.handler.as_mut() else {
            return Err(Error::Inconsistent("no exchange handler"));
        };
        if st.request_state == MessageState::AckExpected {
            // No body bytes before the server acknowledges or the wait
            // window elapses.
            conn.suspend_output();
            return Ok(());
        }
        handler.produce_content(encoder, &mut *conn)?;
        st.request_state = MessageState::BodyStream;
        if encoder.is_completed() {
            trace!("request body complete");
            handler.request_completed();
            st.request_state = MessageState::Completed;
        }
        Ok(())
    }

    fn response_received(&self, conn: &mut dyn ClientConnection) -> Result<(), Error> {
        let state = ensure_state(conn)?;
        let mut state = state.lock().unwrap();
        let st = &mut *state;

        let Some(handler) = st.handler.as_mut() else {
            return Err(Error::Inconsistent("no exchange handler"));
        };
        let Some(response) = conn.take_response() else {
            return Err(Error::Inconsistent("no parsed response head"));
        };
        let status = response.status();

        if status.is_informational() {
            if status != StatusCode::CONTINUE {
                return Err(Error::UnexpectedInterim(status));
            }
            if st.request_state == MessageState::AckExpected {
                trace!("100 continue; resuming output");
                conn.set_socket_timeout(st.saved_timeout);
                conn.request_output();
                st.request_state = MessageState::Ack;
            } else {
                debug!("spurious 100 response ignored");
            }
            return Ok(());
        }

        match st.request_state {
            MessageState::AckExpected => {
                // Final response instead of 100. The body is never sent.
                conn.set_socket_timeout(st.saved_timeout);
                conn.reset_output();
                st.request_state = MessageState::Completed;
            }
            MessageState::BodyStream => {
                // Early response while the body is still being written.
                debug!("early response {}; connection not reusable", status);
                conn.reset_output();
                conn.suspend_output();
                st.request_state = MessageState::Completed;
                st.valid = false;
            }
            _ => {}
        }

        handler.response_received(&response)?;
        st.response_state = MessageState::BodyStream;

        let Some(request) = st.request.as_ref() else {
            return Err(Error::Inconsistent("no request head"));
        };
        let body = can_response_have_body(request, &response);
        st.response = Some(response);
        if !body {
            conn.reset_input();
            process_response(conn, st)?;
        }
        Ok(())
    }

    fn input_ready(
        &self,
        conn: &mut dyn ClientConnection,
        decoder: &mut dyn ContentDecoder,
    ) -> Result<(), Error> {
        let state = ensure_state(conn)?;
        let mut state = state.lock().unwrap();
        let st = &mut *state;

        let Some(handler) = st.handler.as_mut() else {
            return Err(Error::Inconsistent("no exchange handler"));
        };
        handler.consume_content(decoder, &mut *conn)?;
        st.response_state = MessageState::BodyStream;
        if decoder.is_completed() {
            process_response(conn, st)?;
        }
        Ok(())
    }

    fn timeout(&self, conn: &mut dyn ClientConnection) -> Result<(), Error> {
        if let Some(state) = state_of(conn) {
            let mut state = state.lock().unwrap();
            let st = &mut *state;
            if st.request_state == MessageState::AckExpected {
                // The continue window elapsed. Send the body anyway.
                debug!("no 100 response within the wait window; sending body");
                conn.set_socket_timeout(st.saved_timeout);
                conn.request_output();
                st.request_state = MessageState::BodyStream;
                return Ok(());
            }
            fail_handler(st, &Error::SocketTimeout);
        }
        if conn.status() == ConnectionStatus::Active {
            conn.close()?;
            if conn.status() == ConnectionStatus::Closing {
                // Grace period for the peer to observe the close.
                conn.set_socket_timeout(GRACE_CLOSE_TIMEOUT);
            }
        } else {
            shutdown_connection(conn);
        }
        Ok(())
    }

    fn exception(&self, conn: &mut dyn ClientConnection, cause: Error) {
        shutdown_connection(conn);
        match state_of(conn) {
            Some(state) => {
                let mut state = state.lock().unwrap();
                let st = &mut *state;
                debug!("{}; failing exchange: {:?}", cause, st);
                fail_handler(st, &cause);
                st.reset();
            }
            None => {
                debug!("connection error outside an exchange: {}", cause);
            }
        }
    }

    fn closed(&self, conn: &mut dyn ClientConnection) {
        let Some(state) = state_of(conn) else {
            return;
        };
        {
            let mut state = state.lock().unwrap();
            let st = &mut *state;
            close_handler(st);
            st.reset();
        }
        conn.context().remove(EXCHANGE_STATE);
    }
}

fn state_of(conn: &dyn ClientConnection) -> Option<Arc<Mutex<ExchangeState>>> {
    conn.context().get::<Arc<Mutex<ExchangeState>>>(EXCHANGE_STATE)
}

fn ensure_state(conn: &dyn ClientConnection) -> Result<Arc<Mutex<ExchangeState>>, Error> {
    state_of(conn).ok_or(Error::Inconsistent("no exchange state on connection"))
}

/// Invoke the terminal `failed` + `close` pair on the current handler, if
/// one is attached.
fn fail_handler(st: &mut ExchangeState, err: &Error) {
    if let Some(handler) = st.handler.as_mut() {
        handler.failed(err);
        handler.close();
    }
}

fn close_handler(st: &mut ExchangeState) {
    if let Some(handler) = st.handler.as_mut() {
        handler.close();
    }
}

fn shutdown_connection(conn: &mut dyn ClientConnection) {
    if let Err(e) = conn.shutdown() {
        debug!("error on connection shutdown: {}", e);
    }
}

/// Finalize the exchange: decide connection reuse, notify the handler and
/// make the state ready for the next exchange.
fn process_response(conn: &mut dyn ClientConnection, st: &mut ExchangeState) -> Result<(), Error> {
    let Some(handler) = st.handler.as_mut() else {
        return Err(Error::Inconsistent("no exchange handler"));
    };
    if st.valid {
        let Some(request) = st.request.as_ref() else {
            return Err(Error::Inconsistent("no request head"));
        };
        let Some(response) = st.response.as_ref() else {
            return Err(Error::Inconsistent("no response head"));
        };
        if method_is(request.method(), "CONNECT") && response.status().as_u16() < 300 {
            // The tunnel is handed off as-is; reuse policy does not apply.
            trace!("tunnel established; leaving connection open");
        } else if !handler.reuse_strategy().keep_alive(response, handler.context()) {
            debug!("reuse strategy declined keep-alive; closing connection");
            conn.close()?;
        }
    } else {
        debug!("exchange invalidated; closing connection");
        conn.close()?;
    }
    handler.response_completed();
    st.reset();
    Ok(())
}

fn can_response_have_body(request: &Request<()>, response: &Response<()>) -> bool {
    let method = request.method();
    let status = response.status();

    if method_is(method, "HEAD") {
        return false;
    }
    if method_is(method, "CONNECT") && status.as_u16() < 300 {
        return false;
    }
    status.as_u16() >= 200
        && status != StatusCode::NO_CONTENT
        && status != StatusCode::RESET_CONTENT
        && status != StatusCode::NOT_MODIFIED
}

fn method_is(method: &Method, name: &str) -> bool {
    method.as_str().eq_ignore_ascii_case(name)
}

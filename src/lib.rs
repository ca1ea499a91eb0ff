//! Event-driven HTTP/1.x client protocol handling.
//!
//! This library is the glue between a non-blocking HTTP/1.x connection and
//! the user code driving request/response exchanges over it. It owns no
//! sockets and parses no bytes: the connection reports events ("writable",
//! "response head parsed", "timeout") into a [`ClientProtocolHandler`],
//! which sequences the exchange and calls back into a caller-supplied
//! [`ExchangeHandler`]. Message bodies are streamed chunk by chunk through
//! content encoders and decoders; only the message heads are ever held in
//! memory.

#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::uninlined_format_args)]

#[macro_use]
extern crate log;

// Re-export the basis for this library.
pub use http;

mod error;
pub use error::Error;

mod context;
pub use context::{SharedContext, EXCHANGE_HANDLER, EXCHANGE_STATE};

mod conn;
pub use conn::{
    ClientConnection, ClientEventHandler, ConnectionStatus, ContentDecoder, ContentEncoder,
    IoControl,
};

mod ext;

mod handler;
pub use handler::{ExchangeHandler, ReuseStrategy};

mod reuse;
pub use reuse::DefaultReuseStrategy;

pub mod client;
pub use client::ClientProtocolHandler;

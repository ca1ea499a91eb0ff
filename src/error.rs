use std::io;

use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A 1xx interim response other than `100 Continue` arrived.
    #[error("unexpected interim response: {0}")]
    UnexpectedInterim(StatusCode),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("socket timed out")]
    SocketTimeout,

    /// An event arrived for a connection whose exchange bookkeeping is
    /// missing or incomplete. Indicates a bug in the hosting reactor.
    #[error("inconsistent exchange: {0}")]
    Inconsistent(&'static str),

    /// Free-form failure raised by an exchange handler.
    #[error("exchange handler: {0}")]
    Handler(String),
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::SocketTimeout)
            || matches!(self, Error::Io(e) if e.kind() == io::ErrorKind::TimedOut)
    }
}

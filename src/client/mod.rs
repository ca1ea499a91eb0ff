//! HTTP/1.1 client exchange sequencing.
//!
//! One exchange is a single request/response volley on a connection. The
//! request side and the response side each move through the
//! [`MessageState`] phases independently:
//!
//! ```text
//!                     ┌──────────────────┐
//!              ┌──────│      Ready       │─────────────┐
//!              │      └──────────────────┘             │
//!              │                │                      │
//!              │                ▼                      │ no entity
//!              │      ┌──────────────────┐             │
//!              │      │   AckExpected    │──────┐      │
//!              │      └──────────────────┘      │      │
//!              │                │               │      │
//!     entity,  │                ▼               │      │
//!  no continue │      ┌──────────────────┐      │ final response
//!              │      │       Ack        │      │ instead of 100
//!              │      └──────────────────┘      │
//!              │                │               │
//!              │                ▼               │
//!              └─────▶┌──────────────────┐      │
//!                     │    BodyStream    │      │
//!                     └──────────────────┘      │
//!                               │               │
//!                               ▼               ▼
//!                     ┌─────────────────────────────┐
//!                     │          Completed          │
//!                     └─────────────────────────────┘
//! ```
//!
//! The response side only ever moves `Ready → BodyStream → Ready`; interim
//! 1xx responses do not advance it.
//!
//! [`ClientProtocolHandler`] performs these transitions in reaction to
//! connection events and reports progress to the attached
//! [`ExchangeHandler`](crate::ExchangeHandler). Once a response completes,
//! the per-connection state resets and the next exchange may begin on the
//! same connection, subject to the reuse decision.

use std::time::Duration;

mod state;
pub use state::MessageState;

mod proto;
pub use proto::ClientProtocolHandler;

#[cfg(test)]
mod test;

/// Request extension overriding the socket timeout while the exchange
/// waits for a `100 Continue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitForContinue(pub Duration);

/// How long to wait for a `100 Continue` before sending the body anyway,
/// unless the request carries a [`WaitForContinue`] extension.
pub const DEFAULT_WAIT_FOR_CONTINUE: Duration = Duration::from_millis(3000);

/// Socket timeout applied after a graceful close initiated from the
/// timeout handler, so a stalled peer cannot hold the connection open.
pub(crate) const GRACE_CLOSE_TIMEOUT: Duration = Duration::from_millis(250);

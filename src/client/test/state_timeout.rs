use std::time::Duration;

use crate::client::{ClientProtocolHandler, MessageState};
use crate::conn::{ClientConnection, ClientEventHandler, ConnectionStatus};
use crate::context::EXCHANGE_STATE;
use crate::Error;

use super::scenario::{Call, MockConn, Op, Scenario};

#[test]
fn idle_timeout_fails_exchange() {
    let mut x = Scenario::builder()
        .get("http://q.test/")
        .response(200)
        .build()
        .connect();
    x.conn.status_after_close = ConnectionStatus::Closing;

    x.timeout().unwrap();

    let calls = x.journal.calls();
    assert_eq!(
        &calls[calls.len() - 2..],
        &[
            Call::Failed(Error::SocketTimeout.to_string()),
            Call::Close,
        ]
    );
    assert!(x.conn.ops.contains(&Op::Close));
    // Lingering close gets a short grace window.
    assert_eq!(
        x.conn.ops.last(),
        Some(&Op::SetTimeout(Duration::from_millis(250)))
    );
}

#[test]
fn clean_close_needs_no_grace() {
    let mut x = Scenario::builder()
        .get("http://q.test/")
        .response(200)
        .build()
        .connect();

    x.timeout().unwrap();

    assert_eq!(x.conn.ops.last(), Some(&Op::Close));
    assert!(!x
        .conn
        .ops
        .contains(&Op::SetTimeout(Duration::from_millis(250))));
}

#[test]
fn timeout_past_active_shuts_down() {
    let mut x = Scenario::builder()
        .get("http://q.test/")
        .response(200)
        .build()
        .connect();
    x.conn.status = ConnectionStatus::Closing;

    x.timeout().unwrap();

    assert!(x.conn.ops.contains(&Op::Shutdown));
    assert!(!x.conn.ops.contains(&Op::Close));
    let calls = x.journal.calls();
    assert!(matches!(calls[calls.len() - 2], Call::Failed(_)));
    assert_eq!(calls.last(), Some(&Call::Close));
}

#[test]
fn timeout_before_connected() {
    let proto = ClientProtocolHandler::new();
    let mut conn = MockConn::new();

    proto.timeout(&mut conn).unwrap();

    assert_eq!(conn.ops, [Op::Close]);
}

#[test]
fn exception_shuts_down_and_resets() {
    let mut x = Scenario::builder()
        .get("http://q.test/")
        .response(200)
        .build()
        .connect();

    x.exception(Error::Handler("boom".into()));

    assert!(x.conn.ops.contains(&Op::Shutdown));
    let calls = x.journal.calls();
    assert_eq!(
        &calls[calls.len() - 2..],
        &[Call::Failed("exchange handler: boom".into()), Call::Close]
    );
    assert!(!x.has_handler());
    assert_eq!(x.request_state(), MessageState::Ready);
    assert_eq!(x.response_state(), MessageState::Ready);
}

#[test]
fn exception_without_state_only_shuts_down() {
    let proto = ClientProtocolHandler::new();
    let mut conn = MockConn::new();

    proto.exception(&mut conn, Error::Handler("late".into()));

    assert_eq!(conn.ops, [Op::Shutdown]);
}

#[test]
fn closed_releases_handler_and_state() {
    let mut x = Scenario::builder()
        .get("http://q.test/")
        .response(200)
        .build()
        .connect();

    x.closed();

    assert_eq!(x.journal.calls().last(), Some(&Call::Close));
    assert!(!x.conn.context().contains(EXCHANGE_STATE));
}

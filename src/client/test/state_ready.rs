use crate::client::MessageState;

use super::scenario::{Call, Op, Scenario};

#[test]
fn simple_get_keep_alive() {
    let mut x = Scenario::builder()
        .get("http://q.test/")
        .response(200)
        .recv_body("hello", false)
        .build()
        .connect();

    // No body: the request completes while being submitted.
    assert_eq!(x.conn.ops, [Op::SubmitRequest]);
    assert_eq!(
        x.journal.calls(),
        [Call::GenerateRequest, Call::RequestCompleted]
    );
    assert_eq!(x.request_state(), MessageState::Completed);
    assert_eq!(x.response_state(), MessageState::Ready);

    x.respond().unwrap();
    assert_eq!(x.response_state(), MessageState::BodyStream);

    let mut decoder = x.recv_decoder();
    x.input_ready(&mut decoder).unwrap();

    assert_eq!(
        x.journal.calls(),
        [
            Call::GenerateRequest,
            Call::RequestCompleted,
            Call::ResponseReceived(200),
            Call::ConsumeContent,
            Call::ResponseCompleted,
        ]
    );
    assert_eq!(x.received.lock().unwrap().as_slice(), b"hello");

    // Keep-alive granted: the connection stays open and the state resets.
    assert_eq!(x.journal.consults(), 1);
    assert_eq!(x.conn.ops, [Op::SubmitRequest]);
    assert_eq!(x.request_state(), MessageState::Ready);
    assert_eq!(x.response_state(), MessageState::Ready);
    assert!(!x.has_handler());
}

#[test]
fn idle_until_handler_attached() {
    let mut x = Scenario::builder()
        .get("http://q.test/")
        .response(200)
        .detached()
        .build()
        .connect();

    assert!(x.journal.calls().is_empty());
    assert!(x.conn.ops.is_empty());
    assert!(!x.has_handler());
    assert_eq!(x.request_state(), MessageState::Ready);

    x.attach();

    assert_eq!(
        x.journal.calls(),
        [Call::GenerateRequest, Call::RequestCompleted]
    );
    assert_eq!(x.conn.ops, [Op::SubmitRequest]);
}

#[test]
fn deferred_request_keeps_handler() {
    let mut x = Scenario::builder()
        .get("http://q.test/")
        .defer()
        .build()
        .connect();

    assert_eq!(x.journal.calls(), [Call::GenerateRequest]);
    assert!(x.conn.ops.is_empty());
    assert_eq!(x.request_state(), MessageState::Ready);
    assert!(x.has_handler());

    // Asked again on the next readiness signal.
    x.request_ready().unwrap();
    assert_eq!(
        x.journal.calls(),
        [Call::GenerateRequest, Call::GenerateRequest]
    );
}

#[test]
fn done_handler_closed_before_next_exchange() {
    let mut x = Scenario::builder()
        .get("http://q.test/")
        .defer()
        .done()
        .build()
        .connect();

    assert_eq!(x.journal.calls(), [Call::GenerateRequest]);

    x.request_ready().unwrap();

    assert_eq!(x.journal.calls(), [Call::GenerateRequest, Call::Close]);
    assert!(!x.has_handler());
    assert_eq!(x.request_state(), MessageState::Ready);
}

#[test]
fn ignored_while_request_in_flight() {
    let mut x = Scenario::builder()
        .post("http://q.test/")
        .send_body("hallo", false)
        .build()
        .connect();

    assert_eq!(x.request_state(), MessageState::BodyStream);

    x.request_ready().unwrap();

    assert_eq!(x.conn.ops, [Op::SubmitRequest]);
    assert_eq!(x.journal.calls(), [Call::GenerateRequest]);
}

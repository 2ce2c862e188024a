//! Workspace-level end-to-end specs.
//!
//! Drive a real `Session` against an in-process server, including the
//! documented recovery idiom: call `connect()` before every
//! network-using call, and on a transport failure back off and loop.
//! The core never reconnects by itself, so these specs exercise the
//! discover-then-recover contract across a server crash.

use std::time::Duration;

use stalk_client::{PutOptions, PutOutcome, ReserveOutcome, Session};

#[path = "specs/server.rs"]
mod server;

use server::MiniServer;

const BACKOFF: Duration = Duration::from_millis(20);

/// Enqueue with the reconnection idiom: connect (no-op while open),
/// then put; on transport failure back off and loop.
async fn put_with_retry(session: &mut Session, body: &[u8]) -> u64 {
    loop {
        if session.connect().await.is_err() {
            tokio::time::sleep(BACKOFF).await;
            continue;
        }
        match session.put(body, PutOptions::default()).await {
            Ok(PutOutcome::Inserted(id)) => return id,
            Ok(other) => panic!("unexpected put outcome: {other:?}"),
            Err(_) => {
                assert!(session.is_closed(), "failure must close before it surfaces");
                tokio::time::sleep(BACKOFF).await;
            }
        }
    }
}

/// Reserve-and-delete `count` jobs with the same idiom, summing their
/// integer bodies. Jobs are acknowledged before being counted, so a
/// crash between reserve and delete re-delivers instead of losing.
async fn consume_with_retry(session: &mut Session, count: usize) -> u64 {
    let mut total = 0;
    let mut consumed = 0;
    while consumed < count {
        if session.connect().await.is_err() {
            tokio::time::sleep(BACKOFF).await;
            continue;
        }
        match session.reserve_with_timeout(1).await {
            Ok(ReserveOutcome::Reserved(job)) => {
                if job.delete(session).await.is_err() {
                    // Crash before the ack: the job comes back later
                    tokio::time::sleep(BACKOFF).await;
                    continue;
                }
                let body = std::str::from_utf8(job.body()).unwrap();
                total += body.parse::<u64>().unwrap();
                consumed += 1;
            }
            Ok(_) => continue,
            Err(_) => {
                assert!(session.is_closed());
                tokio::time::sleep(BACKOFF).await;
            }
        }
    }
    total
}

#[tokio::test]
async fn put_then_reserve_round_trips_binary_bodies() {
    let server = MiniServer::start().await;
    let mut session = Session::new("127.0.0.1", server.port());
    session.connect().await.unwrap();

    // Embedded terminators must survive length framing
    let body = b"line one\r\nline two\r\n\x00\xff";
    let outcome = session.put(body, PutOptions::default()).await.unwrap();
    let id = outcome.id().unwrap();

    match session.reserve().await.unwrap() {
        ReserveOutcome::Reserved(job) => {
            assert_eq!(job.id(), id);
            assert_eq!(job.body(), body);
        }
        other => panic!("expected a job, got {other:?}"),
    }
}

#[tokio::test]
async fn double_delete_is_soft_and_keeps_the_session_alive() {
    let server = MiniServer::start().await;
    let mut session = Session::new("127.0.0.1", server.port());
    session.connect().await.unwrap();

    session.put(b"once", PutOptions::default()).await.unwrap();
    let job = match session.reserve().await.unwrap() {
        ReserveOutcome::Reserved(job) => job,
        other => panic!("expected a job, got {other:?}"),
    };

    assert!(job.delete(&mut session).await.unwrap().found());
    assert!(!job.delete(&mut session).await.unwrap().found());
    assert!(!session.is_closed());
    assert_eq!(session.connect_count(), 1, "no hidden reconnect happened");
}

#[tokio::test]
async fn worker_survives_server_restart_without_loss_or_duplication() {
    let mut server = MiniServer::start().await;
    let port = server.port();

    let mut producer = Session::new("127.0.0.1", port);
    let mut worker = Session::new("127.0.0.1", port);

    put_with_retry(&mut producer, b"1").await;
    put_with_retry(&mut producer, b"2").await;
    let before_outage = consume_with_retry(&mut worker, 2).await;
    assert_eq!(before_outage, 3);

    server.kill().await;

    // Both sessions still believe they are open; the next real command
    // discovers the dead transport and flips them closed.
    assert!(!worker.is_closed());
    assert!(worker.reserve_with_timeout(0).await.is_err());
    assert!(worker.is_closed());

    server.restart().await;

    put_with_retry(&mut producer, b"3").await;
    put_with_retry(&mut producer, b"4").await;
    let after_outage = consume_with_retry(&mut worker, 2).await;

    assert_eq!(before_outage + after_outage, 10, "no job lost, none duplicated");
    assert!(worker.connect_count() >= 2, "recovery went through a real reconnect");

    let deleted = server.deleted_ids().await;
    let unique: std::collections::HashSet<_> = deleted.iter().collect();
    assert_eq!(deleted.len(), unique.len(), "no job was deleted twice");
    assert_eq!(deleted.len(), 4);
}

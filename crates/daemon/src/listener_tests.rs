// SPDX-License-Identifier: MIT

use super::*;
use sessionfs_adapters::{FakeFileIo, FakeLiveness};
use sessionfs_core::{FakeClock, PathGate};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

fn make_daemon() -> (Arc<Daemon<FakeClock>>, FakeFileIo, FakeLiveness) {
    let registry = Arc::new(Registry::new());
    let file_io = FakeFileIo::new();
    let liveness = FakeLiveness::new();
    let gate = PathGate::new("/mnt");
    let engine = Arc::new(Engine::new(
        Arc::clone(&registry),
        Arc::new(file_io.clone()),
        Arc::new(liveness.clone()),
        gate,
        FakeClock::new(),
    ));
    let daemon = Arc::new(Daemon::new(engine, registry, Arc::new(liveness.clone()), Arc::new(file_io.clone())));
    (daemon, file_io, liveness)
}

async fn send(stream: &mut UnixStream, request: &Request) -> Response {
    write_message(stream, request).await.unwrap();
    read_message(stream).await.unwrap()
}

#[tokio::test]
async fn open_and_close_round_trip_over_the_socket() {
    let (daemon, file_io, _liveness) = make_daemon();
    file_io.seed("/mnt/a.txt", Vec::new());

    let socket_path = tempfile::tempdir().unwrap().keep().join("d.sock");
    let serve_daemon = Arc::clone(&daemon);
    let socket_path_clone = socket_path.clone();
    tokio::spawn(async move { serve_daemon.serve(&socket_path_clone).await.unwrap() });
    tokio::task::yield_now().await;
    // Give the listener a moment to bind.
    for _ in 0..50 {
        if socket_path.exists() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let mut stream = UnixStream::connect(&socket_path).await.unwrap();

    let opened = send(&mut stream, &Request::Open {
        original_path: "/mnt/a.txt".to_string(),
        flags: SESSION_FLAG | O_CREAT,
        mode: 0o644,
        owner_id: 1,
    })
    .await;
    let handle_id = match opened {
        Response::Opened { handle_id, status } => {
            assert_eq!(status, 0);
            handle_id
        }
        other => panic!("unexpected response: {other:?}"),
    };

    let closed = send(&mut stream, &Request::Close {
        original_path: "/mnt/a.txt".to_string(),
        handle_id,
        owner_id: 1,
    })
    .await;
    match closed {
        Response::Closed { snapshot_path } => assert!(!snapshot_path.is_empty()),
        other => panic!("unexpected response: {other:?}"),
    }

    let status = send(&mut stream, &Request::Status).await;
    assert_eq!(status, Response::Status { active_sessions_num: 0 });
}

#[tokio::test]
async fn open_without_session_flag_is_rejected() {
    let (daemon, _file_io, _liveness) = make_daemon();
    let response = daemon.handle_open("/mnt/a.txt".to_string(), O_CREAT, 0o644, 1);
    assert!(matches!(response, Response::Error { .. }));
}

#[tokio::test]
async fn close_unknown_handle_is_bad_handle() {
    let (daemon, _file_io, _liveness) = make_daemon();
    let response = daemon.handle_close(999, 1);
    assert_eq!(response, Response::BadHandle);
}

#[test]
fn parse_open_flags_requires_session_bit() {
    assert!(parse_open_flags(O_CREAT, 0o644).is_err());
    let flags = parse_open_flags(SESSION_FLAG | O_CREAT | O_TRUNC, 0o644).unwrap();
    assert!(flags.create);
    assert!(flags.truncate);
    assert!(flags.read && flags.write);
}

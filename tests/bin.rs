//! Runs the compiled binary and checks what it prints and how it exits.

use std::{
    io::Write,
    net::{SocketAddr, TcpListener},
    process::{Command, Output},
    thread::{self, JoinHandle},
};

/// Accept one client, write `values` as native `i32`s, then close.
fn peer(values: Vec<i32>) -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut sock, _) = listener.accept().unwrap();
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        // the client may hang up early when it stops at a sample limit
        let _ = sock.write_all(&bytes);
    });
    (addr, handle)
}

fn tcprobe(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tcprobe"))
        .args(args)
        .output()
        .expect("failed to launch tcprobe")
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[test]
fn report_mode_prints_values_and_exits_1_on_close() {
    let (addr, handle) = peer(vec![42, -5]);
    let port = addr.port().to_string();

    let out = tcprobe(&["127.0.0.1", &port]);
    handle.join().unwrap();

    let stdout = text(&out.stdout);
    let stderr = text(&out.stderr);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout.contains(&format!("Connected to {addr} ...")));
    assert!(stdout.contains("Client <- Server: 42\nClient <- Server: -5\n"));
    assert!(stdout.contains("2 samples received, connection closed by peer"));

    // diagnostics stay on stderr
    assert!(stderr.contains("WARN"));
    assert!(stderr.contains("connection closed by peer"));
    assert!(!stdout.contains("WARN"));
}

#[test]
fn latency_mode_prints_wait_lines() {
    let (addr, handle) = peer(vec![7]);
    let port = addr.port().to_string();

    let out = tcprobe(&["127.0.0.1", &port, "-m", "latency"]);
    handle.join().unwrap();

    let stdout = text(&out.stdout);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout.contains("Sample #1 after "));
    assert!(stdout.contains("Wait min/avg/max = "));
}

#[test]
fn count_limit_exits_0() {
    let (addr, handle) = peer(vec![1, 2, 3]);
    let port = addr.port().to_string();

    let out = tcprobe(&["127.0.0.1", &port, "-c", "1"]);
    handle.join().unwrap();

    let stdout = text(&out.stdout);
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout.contains("Client <- Server: 1\n"));
    assert!(!stdout.contains("Client <- Server: 2"));
    assert!(stdout.contains("sample limit reached"));
}

#[test]
fn wrong_argument_count_exits_2_without_connecting() {
    let out = tcprobe(&["127.0.0.1"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
    assert!(text(&out.stderr).contains("Usage"));
}

#[test]
fn refused_connection_exits_1() {
    // Grab a free port, then release it so nothing is listening.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }
    .to_string();

    let out = tcprobe(&["127.0.0.1", &port]);

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(text(&out.stderr).contains("can't connect to server"));
}

// End-to-end integration tests for the telemetry ingestion pipeline.
//
// Each test starts a real `TelemetryServer` on an OS-assigned port,
// connects real `TelemetrySender` instances over TCP, and drives the
// server with `tick()` exactly as a host frame loop would:
// sender → wire bytes → receive pump → decoded record → observers.
//
// Timing: senders sleep briefly after writing so bytes arrive before the
// asserting tick loop starts; the tick loops themselves poll with a
// generous timeout, so the sleeps only reduce iteration counts.

use std::thread;
use std::time::Duration;

use hexapod_ingest::client::TelemetrySender;
use hexapod_ingest::error::IngestError;
use hexapod_ingest::server::{IngestConfig, TelemetryServer};
use hexapod_protocol::{RECORD_SIZE, Rotation, TelemetryRecord, Vec3, encode};
use ingest_tests::{start_server, tick_n, tick_until};

/// Pause long enough for written bytes to cross the loopback.
const SETTLE: Duration = Duration::from_millis(50);

fn record(vx: f32, vy: f32, vz: f32, pitch: f32, yaw: f32, roll: f32) -> TelemetryRecord {
    TelemetryRecord::new(Vec3::new(vx, vy, vz), Rotation::new(pitch, yaw, roll))
}

/// Happy path: connect, send one record, observe it after a tick.
#[test]
fn end_to_end_single_record() {
    let (mut server, addr) = start_server();
    assert!(server.is_server_running());
    assert!(!server.is_client_connected());
    assert_eq!(server.record(), TelemetryRecord::default());

    let mut sender = TelemetrySender::connect(addr).unwrap();
    tick_until(&mut server, "client accept", TelemetryServer::is_client_connected);

    let sent = record(1.0, 2.0, 3.0, 10.0, 20.0, 30.0);
    sender.send(&sent).unwrap();
    tick_until(&mut server, "record decode", |s| s.record() == sent);

    assert!(server.is_client_connected());
    assert_eq!(server.velocity(), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(server.rotation(), Rotation::new(10.0, 20.0, 30.0));

    server.stop();
}

/// A partial record is discarded and never contributes to decoded values;
/// the connection stays open and a subsequent whole record decodes.
#[test]
fn partial_record_never_contributes() {
    let (mut server, addr) = start_server();
    let mut sender = TelemetrySender::connect(addr).unwrap();
    tick_until(&mut server, "client accept", TelemetryServer::is_client_connected);

    let full = record(4.0, 5.0, 6.0, -1.0, -2.0, -3.0);
    let bytes = encode(&full);

    // 10 bytes of a record in their own segment.
    sender.send_raw(&bytes[..10]).unwrap();
    thread::sleep(SETTLE);
    tick_n(&mut server, 3);

    // Discarded, connection kept, record untouched.
    assert!(server.is_client_connected());
    assert_eq!(server.record(), TelemetryRecord::default());

    // A complete record in a fresh segment decodes normally.
    sender.send(&full).unwrap();
    tick_until(&mut server, "record decode", |s| s.record() == full);

    server.stop();
}

/// 40 bytes in one read: the first 24 decode, the surplus 16 are dropped
/// and never complete into a second record.
#[test]
fn oversized_read_decodes_first_record_only() {
    let (mut server, addr) = start_server();
    let mut sender = TelemetrySender::connect(addr).unwrap();
    tick_until(&mut server, "client accept", TelemetryServer::is_client_connected);

    let first = record(1.5, 2.5, 3.5, 15.0, 25.0, 35.0);
    let second = record(-9.0, -8.0, -7.0, 100.0, 200.0, 300.0);
    let mut wire = encode(&first).to_vec();
    wire.extend_from_slice(&encode(&second)[..RECORD_SIZE - 8]);
    assert_eq!(wire.len(), 40);

    sender.send_raw(&wire).unwrap();
    thread::sleep(SETTLE);
    tick_until(&mut server, "first record decode", |s| s.record() == first);

    // The truncated second record must never surface.
    tick_n(&mut server, 5);
    assert_eq!(server.record(), first);

    server.stop();
}

/// After a client closes its side, the next ticks admit a replacement
/// without an intervening stop/start.
#[test]
fn replacement_after_disconnect() {
    let (mut server, addr) = start_server();

    let mut first = TelemetrySender::connect(addr).unwrap();
    tick_until(&mut server, "first accept", TelemetryServer::is_client_connected);

    first.shutdown();
    tick_until(&mut server, "disconnect detection", |s| !s.is_client_connected());
    assert!(server.is_server_running());

    let mut second = TelemetrySender::connect(addr).unwrap();
    tick_until(&mut server, "second accept", TelemetryServer::is_client_connected);

    let sent = record(7.0, 8.0, 9.0, 70.0, 80.0, 90.0);
    second.send(&sent).unwrap();
    tick_until(&mut server, "record from replacement", |s| s.record() == sent);

    server.stop();
}

/// At most one client is held at a time: a second connector queues in the
/// listen backlog and is only admitted once the first client is released.
#[test]
fn second_connector_admitted_after_first_releases() {
    let (mut server, addr) = start_server();

    let mut first = TelemetrySender::connect(addr).unwrap();
    tick_until(&mut server, "first accept", TelemetryServer::is_client_connected);

    // Second connection completes at TCP level but stays unaccepted.
    let mut second = TelemetrySender::connect(addr).unwrap();
    tick_n(&mut server, 3);
    assert!(server.is_client_connected());

    let from_first = record(1.0, 1.0, 1.0, 1.0, 1.0, 1.0);
    first.send(&from_first).unwrap();
    tick_until(&mut server, "record from first", |s| s.record() == from_first);

    // Releasing the first makes room for the queued connector.
    first.shutdown();
    let from_second = record(2.0, 2.0, 2.0, 2.0, 2.0, 2.0);
    second.send(&from_second).unwrap();
    tick_until(&mut server, "record from second", |s| s.record() == from_second);
    assert!(server.is_client_connected());

    server.stop();
}

/// A connected but silent client changes nothing tick after tick.
#[test]
fn silent_client_leaves_record_unchanged() {
    let (mut server, addr) = start_server();
    let _sender = TelemetrySender::connect(addr).unwrap();
    tick_until(&mut server, "client accept", TelemetryServer::is_client_connected);

    tick_n(&mut server, 5);
    assert_eq!(server.record(), TelemetryRecord::default());
    assert!(server.is_client_connected());

    server.stop();
}

/// `stop()` is safe before `start`, after `stop`, and tears down the
/// client along with the listener.
#[test]
fn stop_is_idempotent() {
    let config = IngestConfig {
        listen_port: 0,
        auto_start: false,
    };
    let mut server = TelemetryServer::new(config).unwrap();
    assert!(!server.is_server_running());

    // Never started: pure no-ops.
    server.stop();
    server.stop();
    assert!(!server.is_server_running());

    server.start().unwrap();
    let port = server.local_addr().unwrap().port();
    let _sender =
        TelemetrySender::connect(std::net::SocketAddr::from(([127, 0, 0, 1], port))).unwrap();
    tick_until(&mut server, "client accept", TelemetryServer::is_client_connected);

    server.stop();
    assert!(!server.is_server_running());
    assert!(!server.is_client_connected());
    server.stop();
    assert!(!server.is_server_running());
}

/// A second `start` while listening fails without disturbing the running
/// listener, and ticking while stopped is a no-op.
#[test]
fn start_twice_fails_without_side_effects() {
    let (mut server, addr) = start_server();

    assert!(matches!(server.start(), Err(IngestError::AlreadyRunning)));
    assert!(server.is_server_running());

    // The original listener still accepts after the failed start.
    let mut sender = TelemetrySender::connect(addr).unwrap();
    tick_until(&mut server, "client accept", TelemetryServer::is_client_connected);

    let sent = record(0.5, 0.5, 0.5, 5.0, 5.0, 5.0);
    sender.send(&sent).unwrap();
    tick_until(&mut server, "record decode", |s| s.record() == sent);

    server.stop();

    // Ticking a stopped server does nothing and holds no client.
    tick_n(&mut server, 3);
    assert!(!server.is_server_running());
    assert!(!server.is_client_connected());
    // Last-known values survive the stop; only decoding replaces them.
    assert_eq!(server.record(), sent);
}

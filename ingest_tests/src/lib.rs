// Test helpers for ingestion integration tests.
//
// These drive a real `TelemetryServer` the way a host frame loop would —
// `tick()` at a steady cadence — and connect real `TelemetrySender`
// instances over real TCP. All networking uses the production code paths;
// the only test-specific code here is the synchronous tick/wait wrappers.
//
// See `tests/full_pipeline.rs` for the scenarios.

use std::net::SocketAddr;
use std::thread;
use std::time::{Duration, Instant};

use hexapod_ingest::server::{IngestConfig, TelemetryServer};

/// Timeout for tick-until loops.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Sleep between ticks, roughly a 100 Hz frame cadence.
pub const TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Start a server on an OS-assigned port. Returns the server and the
/// loopback address senders should connect to.
pub fn start_server() -> (TelemetryServer, SocketAddr) {
    let config = IngestConfig {
        listen_port: 0,
        auto_start: true,
    };
    let server = TelemetryServer::new(config).expect("server failed to start");
    let port = server.local_addr().expect("server has no local addr").port();
    (server, SocketAddr::from(([127, 0, 0, 1], port)))
}

/// Tick the server at the test cadence until `predicate` holds, panicking
/// after `WAIT_TIMEOUT`.
pub fn tick_until(
    server: &mut TelemetryServer,
    what: &str,
    predicate: impl Fn(&TelemetryServer) -> bool,
) {
    let start = Instant::now();
    loop {
        server.tick(TICK_INTERVAL.as_secs_f32());
        if predicate(server) {
            return;
        }
        assert!(
            start.elapsed() < WAIT_TIMEOUT,
            "timed out waiting for {what}"
        );
        thread::sleep(TICK_INTERVAL);
    }
}

/// Tick the server a fixed number of times at the test cadence. Used when
/// the interesting assertion is that nothing changes.
pub fn tick_n(server: &mut TelemetryServer, n: u32) {
    for _ in 0..n {
        server.tick(TICK_INTERVAL.as_secs_f32());
        thread::sleep(TICK_INTERVAL);
    }
}

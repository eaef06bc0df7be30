// Single-client TCP ingestion server.
//
// `TelemetryServer` owns the listening socket and at most one client
// socket, and is driven entirely by the host's tick: once per tick it
// attempts a non-blocking accept (only while no client is held) and then a
// non-blocking read on the held client. There is no background thread and
// no blocking call anywhere — the host's tick loop is the scheduler, so no
// locking is needed around the socket handles or the decoded record.
//
// Per-tick control flow:
//   tick() → try_accept_client() (only without a client) → poll_and_receive()
//
// Data flows one way: wire bytes → `TelemetryRecord`. Nothing is ever
// written back to the client.
//
// Connection policy is "last connector wins": a fresh connection is only
// admitted once no client is held, so a stale or disconnected sender is
// superseded on the tick after its socket is released. The previous handle
// is always dropped explicitly before a replacement is stored.
//
// Failure handling is local to each receive branch: EOF or a read error
// releases the client while the listener keeps accepting, a partial or
// oversized read is discarded and logged, and nothing short of `stop()`
// tears the listener down.

use std::io::{self, Read};
use std::net::{SocketAddr, TcpListener, TcpStream};

use socket2::{Domain, Protocol, Socket, Type};
use tracing::{debug, info, warn};

use hexapod_protocol::{RECORD_SIZE, Rotation, TelemetryRecord, Vec3, decode};

use crate::error::{IngestError, Result};

/// Listen backlog for not-yet-accepted connections. The expected sender is
/// a single local producer, so the queue stays small.
const LISTEN_BACKLOG: i32 = 8;

/// Per-tick read buffer: one whole record plus headroom, so an oversized
/// read (back-to-back records landing in one segment) is observed and
/// reported instead of silently split across ticks.
const READ_BUFFER_SIZE: usize = 64;

/// Configuration for the ingestion server.
#[derive(Clone, Debug)]
pub struct IngestConfig {
    /// TCP port to listen on. Port 0 lets the OS pick one — the bound
    /// address is then observable via `TelemetryServer::local_addr`.
    pub listen_port: u16,
    /// Start listening during construction.
    pub auto_start: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            listen_port: 8888,
            auto_start: true,
        }
    }
}

/// Single-client telemetry ingestion server. See the module header for the
/// tick-driven architecture.
pub struct TelemetryServer {
    config: IngestConfig,
    listener: Option<TcpListener>,
    client: Option<TcpStream>,
    record: TelemetryRecord,
}

impl TelemetryServer {
    /// Create a server holding a zeroed record. With `auto_start` set this
    /// also begins listening, and a bind failure fails construction.
    pub fn new(config: IngestConfig) -> Result<Self> {
        let mut server = Self {
            config,
            listener: None,
            client: None,
            record: TelemetryRecord::default(),
        };
        if server.config.auto_start {
            server.start()?;
        }
        Ok(server)
    }

    /// Begin listening on the configured port.
    ///
    /// Returns `AlreadyRunning` without side effects when called while
    /// listening, and `Bind` when the socket cannot be set up; no state is
    /// mutated on either failure.
    pub fn start(&mut self) -> Result<()> {
        if self.listener.is_some() {
            warn!(
                port = self.config.listen_port,
                "start ignored: already listening"
            );
            return Err(IngestError::AlreadyRunning);
        }
        let listener = build_listener(self.config.listen_port).map_err(|source| {
            warn!(
                port = self.config.listen_port,
                error = %source,
                "failed to start telemetry server"
            );
            IngestError::Bind {
                port: self.config.listen_port,
                source,
            }
        })?;
        info!(addr = ?listener.local_addr().ok(), "telemetry server listening");
        self.listener = Some(listener);
        Ok(())
    }

    /// Release the client connection (whatever state it is in) and then the
    /// listening socket. Safe to call at any time, including before `start`
    /// or twice in a row — both are pure no-ops.
    pub fn stop(&mut self) {
        if let Some(client) = self.client.take() {
            info!(peer = ?client.peer_addr().ok(), "client connection released");
        }
        if let Some(listener) = self.listener.take() {
            info!(addr = ?listener.local_addr().ok(), "telemetry server stopped");
        }
    }

    /// Pump one cycle: accept a pending connection if no client is held,
    /// then poll the client for data. No-op unless listening.
    ///
    /// `_dt` is the host scheduler's tick delta; the pump has no
    /// time-dependent behavior of its own.
    pub fn tick(&mut self, _dt: f32) {
        if self.listener.is_none() {
            return;
        }
        if self.client.is_none() {
            self.try_accept_client();
        }
        self.poll_and_receive();
    }

    /// Whether the server is currently listening.
    #[must_use]
    pub fn is_server_running(&self) -> bool {
        self.listener.is_some()
    }

    /// Whether a client connection is currently held.
    #[must_use]
    pub fn is_client_connected(&self) -> bool {
        self.client.is_some()
    }

    /// The bound listening address, while running. Mainly useful when the
    /// configured port is 0.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Velocity from the last successfully decoded record.
    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.record.velocity
    }

    /// Rotation from the last successfully decoded record.
    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.record.rotation
    }

    /// The last successfully decoded record as a whole. Zeroed until the
    /// first complete record arrives; unchanged by ticks with no data.
    #[must_use]
    pub fn record(&self) -> TelemetryRecord {
        self.record
    }

    /// Non-blocking accept of one pending connection. A newly accepted
    /// client replaces any previously held one; the old handle is dropped
    /// explicitly before the new one is stored, so a stale socket is never
    /// leaked.
    fn try_accept_client(&mut self) {
        let Some(listener) = &self.listener else {
            return;
        };
        match listener.accept() {
            Ok((stream, peer)) => {
                if let Err(e) = stream.set_nonblocking(true) {
                    warn!(%peer, error = %e, "rejecting client: set_nonblocking failed");
                    return;
                }
                drop(self.client.take());
                info!(%peer, "client connected");
                self.client = Some(stream);
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => warn!(error = %e, "accept failed"),
        }
    }

    /// One non-blocking read on the held client, dispatched by outcome.
    /// Every branch either updates state or logs a diagnostic — no error
    /// propagates to the caller.
    fn poll_and_receive(&mut self) {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        let outcome = match self.client.as_mut() {
            Some(client) => client.read(&mut buf),
            None => return,
        };
        match outcome {
            // No data this tick — the pump's suspension point.
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            // Orderly shutdown from the peer.
            Ok(0) => self.release_client("peer closed connection"),
            Ok(n) if n < RECORD_SIZE => {
                // Records are not reassembled across reads, so a record
                // split by TCP segmentation is lost here. Documented
                // limitation — senders emit one whole record per segment.
                warn!(bytes = n, "partial telemetry record discarded");
            }
            Ok(n) => {
                match decode(&buf[..RECORD_SIZE]) {
                    Ok(record) => {
                        self.record = record;
                        debug!(?record, "telemetry record updated");
                    }
                    Err(e) => warn!(error = %e, "telemetry decode failed"),
                }
                if n > RECORD_SIZE {
                    // No pipelining: anything past the first record in a
                    // single read is dropped.
                    warn!(
                        bytes = n - RECORD_SIZE,
                        "surplus bytes after record discarded"
                    );
                }
            }
            Err(e) => {
                warn!(error = %e, "client read failed");
                self.release_client("read error");
            }
        }
    }

    /// Drop the client socket so a later tick's accept can admit a
    /// replacement. The listener stays up.
    fn release_client(&mut self, reason: &str) {
        if let Some(client) = self.client.take() {
            info!(peer = ?client.peer_addr().ok(), reason, "client released");
        }
    }
}

impl Drop for TelemetryServer {
    // Teardown always runs `stop()` so socket resources are released no
    // matter how the owner goes away.
    fn drop(&mut self) {
        self.stop();
    }
}

/// Build the non-blocking listening socket: SO_REUSEADDR, bound to
/// `0.0.0.0:port`, backlog of `LISTEN_BACKLOG`.
fn build_listener(port: u16) -> io::Result<TcpListener> {
    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;
    let listener = TcpListener::from(socket);
    listener.set_nonblocking(true)?;
    Ok(listener)
}

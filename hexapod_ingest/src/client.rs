// Client-side sender for telemetry records.
//
// `TelemetrySender` is the producing counterpart of `TelemetryServer`: it
// connects over TCP and writes bare 24-byte records, one per `send`. It
// lives in this crate rather than a test crate so integration tests and
// any Rust-side producer exercise the same code path an external sender
// would, and it has no dependency on the server half.
//
// Nagle's algorithm is disabled on the stream so each `send` goes out as
// its own segment — the server reads at most one record per tick and
// coalesced records would be reported as surplus and dropped.

use std::io::Write;
use std::net::{Shutdown, TcpStream, ToSocketAddrs};

use hexapod_protocol::{TelemetryRecord, encode};

use crate::error::Result;

/// TCP sender that emits one 24-byte record per call.
pub struct TelemetrySender {
    stream: TcpStream,
}

impl TelemetrySender {
    /// Connect to an ingestion server.
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }

    /// Send one record as a single write.
    pub fn send(&mut self, record: &TelemetryRecord) -> Result<()> {
        self.stream.write_all(&encode(record))?;
        self.stream.flush()?;
        Ok(())
    }

    /// Send raw bytes as-is. Exists so tests can exercise the server's
    /// partial- and oversized-read handling.
    pub fn send_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream.write_all(bytes)?;
        self.stream.flush()?;
        Ok(())
    }

    /// Close the connection, signalling an orderly disconnect to the
    /// server. Errors are ignored — the socket is going away either way.
    pub fn shutdown(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

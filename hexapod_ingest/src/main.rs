// CLI entry point for the hexapod telemetry ingestion server.
//
// Runs a standalone `TelemetryServer` on a fixed tick cadence — the same
// pump a host animation loop would drive once per frame. Connection events
// are logged at info level and decoded records at debug level; set
// `RUST_LOG=debug` to watch the stream.
//
// Usage:
//   ingest [OPTIONS]
//     --port <PORT>     Listen port (default: 8888)
//     --tick-hz <N>     Pump frequency in Hz (default: 60)

use std::time::Duration;

use hexapod_ingest::server::{IngestConfig, TelemetryServer};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let (config, tick_hz) = parse_args();

    let mut server = match TelemetryServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Failed to start ingest server: {e}");
            std::process::exit(1);
        }
    };

    if let Some(addr) = server.local_addr() {
        println!("Ingest server listening on {addr}");
        println!("Press Ctrl+C to stop.");
    }

    // The process exits on SIGINT/SIGTERM by default, and the OS reclaims
    // the sockets — good enough for a standalone receiver. Embedders that
    // need orderly teardown call `stop()` (or just drop the server).
    let dt = 1.0 / tick_hz as f32;
    let period = Duration::from_secs_f32(dt);
    loop {
        server.tick(dt);
        std::thread::sleep(period);
    }
}

/// Parse command-line arguments. Uses simple `std::env::args()` matching —
/// no clap dependency.
fn parse_args() -> (IngestConfig, u32) {
    let mut config = IngestConfig::default();
    let mut tick_hz: u32 = 60;
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                i += 1;
                config.listen_port = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--port requires a valid port number");
                    std::process::exit(1);
                });
            }
            "--tick-hz" => {
                i += 1;
                tick_hz = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .filter(|hz| *hz > 0)
                    .unwrap_or_else(|| {
                        eprintln!("--tick-hz requires a positive number");
                        std::process::exit(1);
                    });
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    (config, tick_hz)
}

fn print_usage() {
    println!("Usage: ingest [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --port <PORT>     Listen port (default: 8888)");
    println!("  --tick-hz <N>     Pump frequency in Hz (default: 60)");
    println!("  --help, -h        Show this help");
}

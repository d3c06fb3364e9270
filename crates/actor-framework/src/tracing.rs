//! # Observability & Tracing
//!
//! Every actor logs its lifecycle and each request with an `entity_type`
//! field (`Created`, `Updated`, `Action ok`, `Action failed`, `Not found`,
//! `Shutdown`), so one subscriber configuration covers the whole system.
//!
//! ```bash
//! RUST_LOG=info cargo run                       # compact request flow
//! RUST_LOG=debug cargo run                      # full payloads
//! RUST_LOG=stock_saga::saga=debug cargo run     # one module only
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. The format is
/// compact with targets hidden; `entity_type` already says which actor spoke.
/// Calling it more than once is harmless, later calls are ignored.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}

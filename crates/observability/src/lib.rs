//! Process-wide logging setup shared by the catalog binaries.

/// Subscriber construction (filters, JSON formatting).
pub mod subscriber;

/// Initialize tracing/logging for the process.
///
/// `debug` raises the fallback level used when `RUST_LOG` is unset.
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init(debug: bool) {
    subscriber::init(debug);
}

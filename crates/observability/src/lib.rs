//! Tracing/logging setup shared by every portal binary.

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize process-wide logging in the format chosen by `WEWORK_LOG_FORMAT`
/// (JSON unless told otherwise).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}

//! Process-wide tracing setup for hosts embedding the change feed.

/// Initialize tracing with the default settings.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(&tracing::TracingSettings::default());
}

/// Tracing configuration (filters, output format).
pub mod tracing;

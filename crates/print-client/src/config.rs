//! Configuration types for the print client.

use std::time::Duration;

/// Complete printer configuration: timeouts + retry settings.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct PrinterConfig {
    /// Network/transport timeout settings.
    pub timeouts: PrinterTimeouts,
    /// Retry settings for transient failures.
    pub retry: RetryConfig,
}

impl PrinterConfig {
    /// Build a configuration from explicit timeouts and retry settings.
    pub fn new(timeouts: PrinterTimeouts, retry: RetryConfig) -> Self {
        Self { timeouts, retry }
    }
}

/// Timeout settings for printer connections.
///
/// Defaults are tuned for LAN-connected label printers:
/// - `connect`: 5s
/// - `write`: 30s
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct PrinterTimeouts {
    /// Maximum time to wait for the TCP connection to establish.
    pub connect: Duration,
    /// Maximum time to wait for a write to complete.
    pub write: Duration,
}

impl PrinterTimeouts {
    /// Build timeouts from explicit durations.
    pub fn new(connect: Duration, write: Duration) -> Self {
        Self { connect, write }
    }
}

impl Default for PrinterTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            write: Duration::from_secs(30),
        }
    }
}

/// Retry settings for transient failures.
///
/// Uses exponential backoff with optional jitter. Only errors where
/// `PrintError::is_retryable()` returns `true` are retried.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial attempt).
    pub max_attempts: u32,
    /// Initial delay between retries.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Whether to add random jitter to retry delays.
    pub jitter: bool,
}

impl RetryConfig {
    /// Default backoff with a different attempt budget.
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            jitter: true,
        }
    }
}

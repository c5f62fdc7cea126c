//! Typed error types for the print client.

use std::io;
use std::time::Duration;

/// Printer error conditions, categorized by type.
///
/// Use [`PrintError::is_retryable()`] to classify transient vs permanent failures.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    // -- Target --
    /// No printer name or address was configured.
    #[error("no printer configured")]
    NoPrinterConfigured,

    /// The provided address string could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// DNS resolution found no addresses for the given hostname.
    #[error("no address found for hostname: {0}")]
    NoAddressFound(String),

    // -- Connection --
    /// The printer actively refused the connection (e.g. port not open).
    #[error("connection refused: {addr}")]
    ConnectionRefused {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// TCP connect timed out before the printer responded.
    #[error("connection timed out: {addr} ({timeout:?})")]
    ConnectionTimeout {
        /// The address that was attempted.
        addr: String,
        /// The configured timeout that elapsed.
        timeout: Duration,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Connection failed for a reason other than refusal or timeout.
    #[error("connection failed: {addr}")]
    ConnectionFailed {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The printer closed the connection unexpectedly.
    #[error("connection closed by printer")]
    ConnectionClosed,

    // -- I/O --
    /// Writing data to the printer failed.
    #[error("write failed: {0}")]
    WriteFailed(#[source] io::Error),

    // -- Spooler --
    /// The spooler command could not be started.
    #[error("cannot run {program}: {source}")]
    SpawnFailed {
        /// Program that was attempted.
        program: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The spooler command ran but reported failure.
    #[error("{program} failed for queue {queue:?} ({status}): {stderr}")]
    SpoolerFailed {
        /// Program that was run.
        program: String,
        /// Queue the job was submitted to.
        queue: String,
        /// Exit status as reported by the OS.
        status: String,
        /// Trimmed standard error output.
        stderr: String,
    },

    // -- Fallback / Retry --
    /// Every transport in a fallback chain failed.
    #[error("all {} print transports failed", .failures.len())]
    AllTransportsFailed {
        /// Transport description and error, in the order they were tried.
        failures: Vec<(String, PrintError)>,
    },

    /// All retry attempts have been exhausted.
    #[error("retries exhausted after {attempts} attempts")]
    RetriesExhausted {
        /// Total number of attempts made.
        attempts: u32,
        /// The error from the final attempt.
        #[source]
        last_error: Box<PrintError>,
    },

    // -- Configuration --
    /// An invalid configuration was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PrintError {
    /// Returns `true` if this error is transient and worth retrying.
    ///
    /// A failed fallback chain is retryable when every transport in it
    /// failed with a retryable error.
    pub fn is_retryable(&self) -> bool {
        match self {
            PrintError::ConnectionTimeout { .. }
            | PrintError::ConnectionClosed
            | PrintError::WriteFailed(_)
            | PrintError::SpoolerFailed { .. } => true,
            PrintError::AllTransportsFailed { failures } => {
                !failures.is_empty() && failures.iter().all(|(_, e)| e.is_retryable())
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(
            PrintError::ConnectionTimeout {
                addr: "x".into(),
                timeout: Duration::from_secs(1),
                source: io::Error::new(io::ErrorKind::TimedOut, "test"),
            }
            .is_retryable()
        );
        assert!(PrintError::ConnectionClosed.is_retryable());
        assert!(
            PrintError::AllTransportsFailed {
                failures: vec![
                    ("lp Zebra".into(), PrintError::ConnectionClosed),
                    ("lpr Zebra".into(), PrintError::ConnectionClosed),
                ],
            }
            .is_retryable()
        );
        assert!(
            PrintError::WriteFailed(io::Error::new(io::ErrorKind::BrokenPipe, "test"))
                .is_retryable()
        );
        assert!(
            PrintError::SpoolerFailed {
                program: "lp".into(),
                queue: "Zebra".into(),
                status: "exit status: 1".into(),
                stderr: "scheduler not responding".into(),
            }
            .is_retryable()
        );
    }

    #[test]
    fn non_retryable_errors() {
        assert!(!PrintError::NoPrinterConfigured.is_retryable());
        assert!(
            !PrintError::ConnectionRefused {
                addr: "x".into(),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "test"),
            }
            .is_retryable()
        );
        assert!(
            !PrintError::ConnectionFailed {
                addr: "x".into(),
                source: io::Error::other("test"),
            }
            .is_retryable()
        );
        assert!(!PrintError::InvalidAddress("x".into()).is_retryable());
        assert!(!PrintError::NoAddressFound("x".into()).is_retryable());
        assert!(
            !PrintError::SpawnFailed {
                program: "lp".into(),
                source: io::Error::new(io::ErrorKind::NotFound, "test"),
            }
            .is_retryable()
        );
        assert!(
            !PrintError::AllTransportsFailed {
                failures: vec![
                    ("lp Zebra".into(), PrintError::ConnectionClosed),
                    (
                        "lpr Zebra".into(),
                        PrintError::SpawnFailed {
                            program: "lpr".into(),
                            source: io::Error::new(io::ErrorKind::NotFound, "test"),
                        },
                    ),
                ],
            }
            .is_retryable()
        );
        assert!(!PrintError::AllTransportsFailed { failures: vec![] }.is_retryable());
        assert!(!PrintError::InvalidConfig("test".into()).is_retryable());
        assert!(
            !PrintError::RetriesExhausted {
                attempts: 3,
                last_error: Box::new(PrintError::ConnectionClosed),
            }
            .is_retryable()
        );
    }

    #[test]
    fn all_transports_failed_counts_failures() {
        let err = PrintError::AllTransportsFailed {
            failures: vec![
                ("tcp 10.0.0.5:9100".into(), PrintError::ConnectionClosed),
                ("spooler Zebra".into(), PrintError::NoPrinterConfigured),
            ],
        };
        assert_eq!(err.to_string(), "all 2 print transports failed");
    }
}

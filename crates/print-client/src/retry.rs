//! Retry wrapper with exponential backoff and reconnection.

use std::time::{Duration, SystemTime};

use tracing::{debug, warn};

use crate::config::RetryConfig;
use crate::{PrintError, Printer};

/// Retries retryable failures of the wrapped printer.
///
/// Between attempts it sleeps with exponential backoff and asks the inner
/// printer to [`reconnect`](Printer::reconnect). Non-retryable errors are
/// returned immediately.
pub struct RetryPrinter<P> {
    inner: P,
    retry_config: RetryConfig,
}

impl<P> RetryPrinter<P> {
    /// Wrap `inner` with the given retry policy.
    pub fn new(inner: P, retry_config: RetryConfig) -> Self {
        Self {
            inner,
            retry_config,
        }
    }

    /// Unwrap the inner printer.
    pub fn into_inner(self) -> P {
        self.inner
    }

    /// Borrow the inner printer.
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: Printer> Printer for RetryPrinter<P> {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        retry_with_reconnect(&self.retry_config, &mut self.inner, |p| p.send_raw(data))
    }

    fn reconnect(&mut self) -> Result<(), PrintError> {
        self.inner.reconnect()
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}

// ── Retry helper ───────────────────────────────────────────────────────

fn retry_with_reconnect<T, P, F>(
    config: &RetryConfig,
    inner: &mut P,
    mut op: F,
) -> Result<T, PrintError>
where
    P: Printer,
    F: FnMut(&mut P) -> Result<T, PrintError>,
{
    if config.max_attempts == 0 {
        return Err(PrintError::InvalidConfig(
            "max_attempts must be >= 1".into(),
        ));
    }

    let mut attempt = 0;
    loop {
        let error = match op(inner) {
            Ok(val) => return Ok(val),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => e,
        };
        attempt += 1;

        if attempt >= config.max_attempts {
            return Err(PrintError::RetriesExhausted {
                attempts: config.max_attempts,
                last_error: Box::new(error),
            });
        }

        let delay = compute_delay(config, attempt - 1);
        warn!(
            printer = %inner.describe(),
            attempt,
            max_attempts = config.max_attempts,
            ?delay,
            error = %error,
            "print attempt failed, retrying"
        );
        std::thread::sleep(delay);
        if let Err(e) = inner.reconnect() {
            debug!(error = %e, "reconnect before retry failed");
        }
    }
}

fn compute_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base = config
        .initial_delay
        .saturating_mul(2u32.saturating_pow(attempt));
    let capped = base.min(config.max_delay);

    if config.jitter {
        // Pick a duration in [capped/2, capped] using clock nanoseconds.
        let nanos = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .subsec_nanos();
        let half = capped / 2;
        let jitter_range_nanos = capped.as_nanos().saturating_sub(half.as_nanos());
        if jitter_range_nanos == 0 {
            return capped;
        }
        let offset_nanos = (nanos as u128) % jitter_range_nanos;
        half + Duration::from_nanos(offset_nanos as u64)
    } else {
        capped
    }
}

// ── Tests ──────────────────────────────────────────────────────────────

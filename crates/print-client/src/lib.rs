//! Printer transports for finished label markup.
//!
//! Markup reaches a printer either over raw TCP (port 9100) or through the
//! OS print spooler. Transports compose: [`RetryPrinter`] adds backoff and
//! reconnection, [`FallbackPrinter`] tries alternatives in order.
//! The API is synchronous (`std::net`, `std::process`), with no async
//! runtime required.
mod config;
mod error;
mod fallback;
mod retry;
mod spool;
mod target;
#[cfg(feature = "tcp")]
mod tcp;

pub use config::{PrinterConfig, PrinterTimeouts, RetryConfig};
pub use error::PrintError;
pub use fallback::FallbackPrinter;
pub use retry::RetryPrinter;
pub use spool::{LpstatDirectory, SpoolPrinter, WindowsDirectory, parse_lpstat, system_directory};
pub use target::{DEFAULT_PORT, PrinterTarget, resolve_printer_addr};
#[cfg(feature = "tcp")]
pub use tcp::TcpPrinter;

use std::ops::ControlFlow;

// ── Traits ──────────────────────────────────────────────────────────────

/// Send data to a printer. All transports implement this.
pub trait Printer: Send {
    /// Send raw bytes to the printer.
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError>;

    /// Send a ZPL string to the printer (convenience wrapper over `send_raw`).
    fn send_zpl(&mut self, zpl: &str) -> Result<(), PrintError> {
        self.send_raw(zpl.as_bytes())
    }

    /// Re-establish the connection after a failure.
    ///
    /// Connectionless transports keep the default, which does nothing.
    fn reconnect(&mut self) -> Result<(), PrintError> {
        Ok(())
    }

    /// Short human-readable name used in logs and error reports.
    fn describe(&self) -> String {
        "printer".to_string()
    }
}

impl<P: Printer + ?Sized> Printer for Box<P> {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        (**self).send_raw(data)
    }

    fn reconnect(&mut self) -> Result<(), PrintError> {
        (**self).reconnect()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Lists the printers installed on this machine.
pub trait PrinterDirectory {
    /// Queue names known to the OS, in the order it reports them.
    fn list_printers(&self) -> Result<Vec<String>, PrintError>;
}

/// Open the transport for a configured printer target.
///
/// Network targets get a lazily connected [`TcpPrinter`]; queue names get
/// the platform spooler chain. Both are wrapped in a [`RetryPrinter`].
#[cfg(feature = "tcp")]
pub fn open_printer(
    target: &PrinterTarget,
    config: PrinterConfig,
) -> Result<Box<dyn Printer>, PrintError> {
    let retry = config.retry.clone();
    match target {
        PrinterTarget::Network(addr) => {
            let tcp = TcpPrinter::lazy(addr, config)?;
            Ok(Box::new(RetryPrinter::new(tcp, retry)))
        }
        PrinterTarget::Queue(queue) => Ok(Box::new(RetryPrinter::new(
            SpoolPrinter::for_platform(queue),
            retry,
        ))),
    }
}

// ── Batch helpers ───────────────────────────────────────────────────────

/// Progress report for batch printing.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProgress {
    /// How many labels have been sent so far.
    pub sent: usize,
    /// Total labels in the batch.
    pub total: usize,
}

/// Result of a batch print operation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// Number of labels successfully sent to the printer.
    pub sent: usize,
    /// Total labels in the batch.
    pub total: usize,
}

/// Send a batch of labels with optional progress reporting.
///
/// The `on_progress` callback receives a `BatchProgress` and can return
/// `ControlFlow::Break(())` to abort the batch early.
pub fn send_batch<P, F>(
    printer: &mut P,
    labels: &[impl AsRef<[u8]>],
    mut on_progress: F,
) -> Result<BatchResult, PrintError>
where
    P: Printer + ?Sized,
    F: FnMut(BatchProgress) -> ControlFlow<(), ()>,
{
    let total = labels.len();
    for (i, label) in labels.iter().enumerate() {
        printer.send_raw(label.as_ref())?;

        let progress = BatchProgress { sent: i + 1, total };
        if let ControlFlow::Break(()) = on_progress(progress) {
            return Ok(BatchResult { sent: i + 1, total });
        }
    }

    Ok(BatchResult { sent: total, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::ControlFlow;

    struct MockBatchPrinter {
        sent: Vec<Vec<u8>>,
        fail_on: Option<usize>,
    }

    impl Printer for MockBatchPrinter {
        fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
            if Some(self.sent.len()) == self.fail_on {
                return Err(PrintError::WriteFailed(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "mock error",
                )));
            }
            self.sent.push(data.to_vec());
            Ok(())
        }
    }

    fn mock(fail_on: Option<usize>) -> MockBatchPrinter {
        MockBatchPrinter {
            sent: Vec::new(),
            fail_on,
        }
    }

    #[test]
    fn batch_happy_path() {
        let mut printer = mock(None);
        let labels = vec!["^XA^FDOne^FS^XZ", "^XA^FDTwo^FS^XZ", "^XA^FDThree^FS^XZ"];
        let result = send_batch(&mut printer, &labels, |_| ControlFlow::Continue(())).unwrap();
        assert_eq!(result.sent, 3);
        assert_eq!(result.total, 3);
        assert_eq!(printer.sent.len(), 3);
    }

    #[test]
    fn batch_early_abort() {
        let mut printer = mock(None);
        let labels = vec!["one", "two", "three", "four", "five"];
        let result = send_batch(&mut printer, &labels, |progress| {
            if progress.sent >= 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();
        assert_eq!(result.sent, 2);
        assert_eq!(result.total, 5);
    }

    #[test]
    fn batch_error_propagates() {
        let mut printer = mock(Some(1));
        let labels = vec!["ok", "fail", "never"];
        let result = send_batch(&mut printer, &labels, |_| ControlFlow::Continue(()));
        assert!(result.is_err());
        assert_eq!(printer.sent.len(), 1);
    }

    #[test]
    fn boxed_printer_forwards() {
        let mut boxed: Box<dyn Printer> = Box::new(mock(None));
        boxed.send_zpl("^XA^XZ").unwrap();
        assert_eq!(boxed.describe(), "printer");
        assert!(boxed.reconnect().is_ok());
    }

    #[cfg(feature = "tcp")]
    #[test]
    fn queue_target_opens_spooler_chain() {
        let target = PrinterTarget::parse("Zebra_GK420d").unwrap();
        let printer = open_printer(&target, PrinterConfig::default()).unwrap();
        assert!(printer.describe().starts_with("fallback ["));
    }
}

//! Ordered chain of transports.

use tracing::{info, warn};

use crate::{PrintError, Printer};

/// Tries each transport in order until one accepts the job.
///
/// The error from every failed transport is kept and reported together in
/// [`PrintError::AllTransportsFailed`].
#[derive(Default)]
pub struct FallbackPrinter {
    transports: Vec<Box<dyn Printer>>,
}

impl FallbackPrinter {
    /// An empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transport to the end of the chain.
    pub fn push(&mut self, printer: impl Printer + 'static) {
        self.transports.push(Box::new(printer));
    }

    /// Builder form of [`FallbackPrinter::push`].
    pub fn with(mut self, printer: impl Printer + 'static) -> Self {
        self.push(printer);
        self
    }

    /// Number of transports in the chain.
    pub fn len(&self) -> usize {
        self.transports.len()
    }

    /// `true` when the chain has no transports.
    pub fn is_empty(&self) -> bool {
        self.transports.is_empty()
    }
}

impl Printer for FallbackPrinter {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        if self.transports.is_empty() {
            return Err(PrintError::NoPrinterConfigured);
        }

        let mut failures = Vec::new();
        for transport in &mut self.transports {
            let name = transport.describe();
            match transport.send_raw(data) {
                Ok(()) => {
                    if !failures.is_empty() {
                        info!(transport = %name, failed = failures.len(), "printed after fallback");
                    }
                    return Ok(());
                }
                Err(e) => {
                    warn!(transport = %name, error = %e, "transport failed");
                    failures.push((name, e));
                }
            }
        }
        Err(PrintError::AllTransportsFailed { failures })
    }

    fn reconnect(&mut self) -> Result<(), PrintError> {
        for transport in &mut self.transports {
            if let Err(e) = transport.reconnect() {
                warn!(transport = %transport.describe(), error = %e, "reconnect failed");
            }
        }
        Ok(())
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self.transports.iter().map(|t| t.describe()).collect();
        format!("fallback [{}]", names.join(", "))
    }
}

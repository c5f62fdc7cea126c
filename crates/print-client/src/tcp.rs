//! Raw TCP transport (port 9100).

use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};
use tracing::debug;

use crate::target::resolve_printer_addr;
use crate::{PrintError, Printer, PrinterConfig};

/// A printer reached over a raw TCP socket.
///
/// The connection is opened by [`TcpPrinter::connect`] and re-opened on the
/// next send after a write failure.
pub struct TcpPrinter {
    stream: Option<TcpStream>,
    config: PrinterConfig,
    addr: SocketAddr,
}

impl TcpPrinter {
    /// Resolve `addr` and connect to it.
    pub fn connect(addr: &str, config: PrinterConfig) -> Result<Self, PrintError> {
        let mut printer = Self::lazy(addr, config)?;
        printer.reconnect()?;
        Ok(printer)
    }

    /// Resolve `addr` without connecting; the first send opens the socket.
    pub fn lazy(addr: &str, config: PrinterConfig) -> Result<Self, PrintError> {
        let addr = resolve_printer_addr(addr)?;
        Ok(Self {
            stream: None,
            config,
            addr,
        })
    }

    fn open_stream(addr: &SocketAddr, config: &PrinterConfig) -> Result<TcpStream, PrintError> {
        let stream =
            TcpStream::connect_timeout(addr, config.timeouts.connect).map_err(|e| {
                match e.kind() {
                    io::ErrorKind::ConnectionRefused => PrintError::ConnectionRefused {
                        addr: addr.to_string(),
                        source: e,
                    },
                    io::ErrorKind::TimedOut => PrintError::ConnectionTimeout {
                        addr: addr.to_string(),
                        timeout: config.timeouts.connect,
                        source: e,
                    },
                    _ => PrintError::ConnectionFailed {
                        addr: addr.to_string(),
                        source: e,
                    },
                }
            })?;

        configure_stream(&stream, addr, config)?;
        debug!(%addr, "printer connection opened");
        Ok(stream)
    }

    /// Resolved address of the printer.
    pub fn remote_addr(&self) -> SocketAddr {
        self.addr
    }

    /// `true` while a socket is open.
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }
}

impl Printer for TcpPrinter {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        if self.stream.is_none() {
            self.stream = Some(Self::open_stream(&self.addr, &self.config)?);
        }
        let Some(stream) = self.stream.as_mut() else {
            return Err(PrintError::ConnectionClosed);
        };

        let result = stream
            .write_all(data)
            .and_then(|()| stream.flush())
            .map_err(|e| match e.kind() {
                io::ErrorKind::BrokenPipe | io::ErrorKind::ConnectionReset => {
                    PrintError::ConnectionClosed
                }
                _ => PrintError::WriteFailed(e),
            });
        if result.is_err() {
            self.close();
        } else {
            debug!(addr = %self.addr, bytes = data.len(), "sent to printer");
        }
        result
    }

    fn reconnect(&mut self) -> Result<(), PrintError> {
        self.close();
        self.stream = Some(Self::open_stream(&self.addr, &self.config)?);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("tcp {}", self.addr)
    }
}

impl Drop for TcpPrinter {
    fn drop(&mut self) {
        self.close();
    }
}

// ── Helpers ────────────────────────────────────────────────────────────

fn configure_stream(
    stream: &TcpStream,
    addr: &SocketAddr,
    config: &PrinterConfig,
) -> Result<(), PrintError> {
    let failed = |e| PrintError::ConnectionFailed {
        addr: addr.to_string(),
        source: e,
    };

    stream.set_nodelay(true).map_err(failed)?;
    configure_keepalive(stream, Duration::from_secs(60)).map_err(failed)?;
    stream
        .set_write_timeout(Some(config.timeouts.write))
        .map_err(failed)?;

    Ok(())
}

fn configure_keepalive(stream: &TcpStream, interval: Duration) -> io::Result<()> {
    let keepalive = TcpKeepalive::new().with_time(interval);

    #[cfg(any(target_os = "linux", target_os = "macos"))]
    let keepalive = keepalive.with_interval(interval);

    SockRef::from(stream).set_tcp_keepalive(&keepalive)?;
    Ok(())
}

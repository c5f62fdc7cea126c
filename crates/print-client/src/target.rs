//! Printer target parsing and network address resolution.
//!
//! A configured printer is either a network endpoint reached over raw TCP
//! or the name of a queue managed by the OS print spooler.

use std::fmt;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

use crate::PrintError;

/// Default raw printing port used by Zebra and most ZPL printers.
pub const DEFAULT_PORT: u16 = 9100;

const TCP_SCHEME: &str = "tcp://";

/// Where label markup should be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrinterTarget {
    /// Raw TCP endpoint, `host:port` form.
    Network(String),
    /// OS print queue name.
    Queue(String),
}

impl PrinterTarget {
    /// Classify a configured printer string.
    ///
    /// - `tcp://host[:port]` is always a network target; the port defaults
    ///   to 9100.
    /// - A literal IP address, with or without port, or `name:port` with a
    ///   numeric port is a network target.
    /// - Anything else is a spooler queue name.
    ///
    /// An empty or whitespace-only input yields
    /// [`PrintError::NoPrinterConfigured`].
    pub fn parse(input: &str) -> Result<Self, PrintError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PrintError::NoPrinterConfigured);
        }

        if let Some(rest) = input.strip_prefix(TCP_SCHEME) {
            let rest = rest.trim_end_matches('/');
            if rest.is_empty() {
                return Err(PrintError::InvalidAddress(input.to_string()));
            }
            return Ok(PrinterTarget::Network(with_default_port(rest)));
        }

        if input.parse::<SocketAddr>().is_ok() {
            return Ok(PrinterTarget::Network(input.to_string()));
        }
        if let Ok(ip) = input.parse::<IpAddr>() {
            return Ok(PrinterTarget::Network(
                SocketAddr::new(ip, DEFAULT_PORT).to_string(),
            ));
        }
        if let Some((host, port)) = input.rsplit_once(':')
            && !host.is_empty()
            && !host.contains(char::is_whitespace)
            && port.parse::<u16>().is_ok()
        {
            return Ok(PrinterTarget::Network(input.to_string()));
        }

        Ok(PrinterTarget::Queue(input.to_string()))
    }

    /// `true` for raw TCP targets.
    pub fn is_network(&self) -> bool {
        matches!(self, PrinterTarget::Network(_))
    }
}

impl fmt::Display for PrinterTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrinterTarget::Network(addr) => write!(f, "{TCP_SCHEME}{addr}"),
            PrinterTarget::Queue(name) => f.write_str(name),
        }
    }
}

fn with_default_port(host: &str) -> String {
    if host.parse::<SocketAddr>().is_ok() {
        return host.to_string();
    }
    if let Ok(ip) = host.parse::<IpAddr>() {
        return SocketAddr::new(ip, DEFAULT_PORT).to_string();
    }
    match host.rsplit_once(':') {
        Some((_, port)) if port.parse::<u16>().is_ok() => host.to_string(),
        _ => format!("{host}:{DEFAULT_PORT}"),
    }
}

/// Resolve a printer address string to a socket address.
///
/// Accepts `ip:port`, a bare IP, `host:port`, or a bare hostname; missing
/// ports default to [`DEFAULT_PORT`].
pub fn resolve_printer_addr(input: &str) -> Result<SocketAddr, PrintError> {
    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = input.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    if let Ok(mut addrs) = input.to_socket_addrs()
        && let Some(addr) = addrs.next()
    {
        return Ok(addr);
    }

    if let Ok(mut addrs) = (input, DEFAULT_PORT).to_socket_addrs()
        && let Some(addr) = addrs.next()
    {
        return Ok(addr);
    }

    Err(PrintError::NoAddressFound(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(s: &str) -> PrinterTarget {
        PrinterTarget::Network(s.into())
    }

    #[test]
    fn tcp_scheme_is_network() {
        assert_eq!(
            PrinterTarget::parse("tcp://10.0.0.5").unwrap(),
            network("10.0.0.5:9100")
        );
        assert_eq!(
            PrinterTarget::parse("tcp://10.0.0.5:6101").unwrap(),
            network("10.0.0.5:6101")
        );
        assert_eq!(
            PrinterTarget::parse("tcp://zebra-kitchen.local").unwrap(),
            network("zebra-kitchen.local:9100")
        );
    }

    #[test]
    fn ip_literals_are_network() {
        assert_eq!(
            PrinterTarget::parse("192.168.1.55").unwrap(),
            network("192.168.1.55:9100")
        );
        assert_eq!(
            PrinterTarget::parse("192.168.1.55:9100").unwrap(),
            network("192.168.1.55:9100")
        );
        assert_eq!(PrinterTarget::parse("::1").unwrap(), network("[::1]:9100"));
    }

    #[test]
    fn host_with_numeric_port_is_network() {
        assert_eq!(
            PrinterTarget::parse("printer01.local:9100").unwrap(),
            network("printer01.local:9100")
        );
    }

    #[test]
    fn other_names_are_queues() {
        assert_eq!(
            PrinterTarget::parse("Zebra_GK420d").unwrap(),
            PrinterTarget::Queue("Zebra_GK420d".into())
        );
        assert_eq!(
            PrinterTarget::parse(" ZDesigner GK420d (EPL) ").unwrap(),
            PrinterTarget::Queue("ZDesigner GK420d (EPL)".into())
        );
        assert!(!PrinterTarget::parse("Cozinha").unwrap().is_network());
    }

    #[test]
    fn empty_target_is_not_configured() {
        assert!(matches!(
            PrinterTarget::parse("   "),
            Err(PrintError::NoPrinterConfigured)
        ));
        assert!(matches!(
            PrinterTarget::parse("tcp://"),
            Err(PrintError::InvalidAddress(_))
        ));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for input in ["tcp://10.0.0.5:9100", "Zebra_GK420d"] {
            let target = PrinterTarget::parse(input).unwrap();
            assert_eq!(PrinterTarget::parse(&target.to_string()).unwrap(), target);
        }
    }

    #[test]
    fn test_ip_with_port() {
        let addr = resolve_printer_addr("192.168.1.55:9100").unwrap();
        assert_eq!(addr.ip().to_string(), "192.168.1.55");
        assert_eq!(addr.port(), 9100);
    }

    #[test]
    fn test_ip_without_port_defaults_to_9100() {
        let addr = resolve_printer_addr("192.168.1.55").unwrap();
        assert_eq!(addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn test_localhost_without_port() {
        let addr = resolve_printer_addr("localhost").unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn test_unresolvable_hostname() {
        match resolve_printer_addr("no-such-host.invalid") {
            Err(PrintError::NoAddressFound(s)) => assert_eq!(s, "no-such-host.invalid"),
            other => panic!("expected NoAddressFound, got {:?}", other),
        }
    }
}

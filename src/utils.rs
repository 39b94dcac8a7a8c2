//! Utility helpers: host identity and clock text for the display.

use std::net::UdpSocket;

use chrono::{DateTime, Local, Timelike};

/// Hostname and primary IP address, resolved once at startup and shown
/// right-aligned on the second display line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    /// The machine's hostname.
    pub hostname: String,
    /// First non-loopback IPv4 address, or a placeholder if none was found.
    pub ip: String,
}

impl HostInfo {
    /// Placeholder shown when no routable address could be determined.
    pub const UNKNOWN_IP: &'static str = "xxx.xxx.xxx.xxx";

    /// Resolve the host details from the running system.
    pub fn detect() -> Self {
        Self {
            hostname: hostname(),
            ip: local_ip().unwrap_or_else(|| Self::UNKNOWN_IP.to_string()),
        }
    }

    /// Display text for the status line.
    pub fn as_status_text(&self) -> String {
        format!("Host: {}, IP: {}  ", self.hostname, self.ip)
    }
}

fn hostname() -> String {
    std::fs::read_to_string("/etc/hostname")
        .map(|s| s.trim().to_string())
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("HOSTNAME").ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Address of the interface that routes towards the LAN, found by opening a
/// UDP socket (nothing is actually sent).
fn local_ip() -> Option<String> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    let addr = socket.local_addr().ok()?;
    if addr.ip().is_loopback() {
        None
    } else {
        Some(addr.ip().to_string())
    }
}

/// Wall-clock text for the first display line, `HH:MM:SS` with a trailing
/// space as padding against the screen edge.
pub fn clock_text(now: DateTime<Local>) -> String {
    format!("{:02}:{:02}:{:02} ", now.hour(), now.minute(), now.second())
}

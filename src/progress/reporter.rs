//! Progress destinations
//!
//! Reporting is best effort: a failed send is logged at trace level and
//! otherwise ignored, so a missing listener never slows the search.

use super::status::{ProgressMessage, StatusFrame, make_message, parse_message};
use crate::error::{MastermindError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::path::PathBuf;
use std::time::Duration;
use tracing::trace;

#[cfg(unix)]
use std::os::unix::net::UnixDatagram;

const UNIX_PREFIX: &str = "unix://";
const IP_PREFIX: &str = "ip://";
const MAX_MESSAGE: usize = 4096;

/// Where progress datagrams go
///
/// Syntax: `unix://<id>/<path>` or `ip://<id>/<host>:<port>`. The id names
/// the message source and cannot contain `/`. An absolute unix path keeps its
/// leading slash, as in `unix://worker//tmp/mm.progress`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressAddress {
    Unix { id: String, path: PathBuf },
    Ip { id: String, host: String, port: u16 },
}

impl ProgressAddress {
    /// # Errors
    /// Returns `Configuration` for an unknown scheme, a missing id, or a bad port.
    pub fn parse(address: &str) -> Result<Self> {
        let bad = |why: &str| {
            MastermindError::Configuration(format!("Bad progress address '{address}': {why}"))
        };

        if let Some(rest) = address.strip_prefix(UNIX_PREFIX) {
            let (id, path) = rest.split_once('/').ok_or_else(|| bad("missing '/<path>'"))?;
            if id.is_empty() || path.is_empty() {
                return Err(bad("empty id or path"));
            }
            return Ok(Self::Unix {
                id: id.to_string(),
                path: PathBuf::from(path),
            });
        }

        if let Some(rest) = address.strip_prefix(IP_PREFIX) {
            let (id, endpoint) = rest.split_once('/').ok_or_else(|| bad("missing '/<host>:<port>'"))?;
            let (host, port) = endpoint.rsplit_once(':').ok_or_else(|| bad("missing port"))?;
            if id.is_empty() || host.is_empty() {
                return Err(bad("empty id or host"));
            }
            let port = port.parse().map_err(|_| bad("port is not a number"))?;
            return Ok(Self::Ip {
                id: id.to_string(),
                host: host.to_string(),
                port,
            });
        }

        Err(bad("unrecognized scheme, expected unix:// or ip://"))
    }

    /// Source name carried in every message
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Unix { id, .. } | Self::Ip { id, .. } => id,
        }
    }

    fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
        (host, port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| MastermindError::Configuration(format!("Cannot resolve host '{host}'")))
    }
}

/// Connected sending socket
pub enum DatagramTarget {
    #[cfg(unix)]
    Unix(UnixDatagram, PathBuf),
    Udp(UdpSocket, SocketAddr),
}

/// Receiver end of a progress address
pub enum ProgressListener {
    #[cfg(unix)]
    Unix(UnixDatagram, PathBuf),
    Udp(UdpSocket),
}

impl ProgressListener {
    /// Bind to `address`; an existing unix socket file is replaced
    ///
    /// # Errors
    /// Returns `Io` if the socket cannot be bound, `Configuration` if the
    /// address scheme is unsupported on this platform.
    pub fn bind(address: &ProgressAddress) -> Result<Self> {
        match address {
            #[cfg(unix)]
            ProgressAddress::Unix { path, .. } => {
                if path.exists() {
                    std::fs::remove_file(path)?;
                }
                Ok(Self::Unix(UnixDatagram::bind(path)?, path.clone()))
            }
            #[cfg(not(unix))]
            ProgressAddress::Unix { .. } => Err(MastermindError::Configuration(
                "unix progress sockets are not supported on this platform".to_string(),
            )),
            ProgressAddress::Ip { host, port, .. } => {
                let addr = ProgressAddress::resolve(host, *port)?;
                Ok(Self::Udp(UdpSocket::bind(addr)?))
            }
        }
    }

    /// Block until the next message arrives
    ///
    /// # Errors
    /// Returns `Io` on socket failure, `Validation` on a malformed message.
    pub fn recv(&self) -> Result<ProgressMessage> {
        let mut buf = [0u8; MAX_MESSAGE];
        let n = match self {
            #[cfg(unix)]
            Self::Unix(socket, _) => socket.recv(&mut buf)?,
            Self::Udp(socket) => socket.recv(&mut buf)?,
        };
        parse_message(&buf[..n])
    }
}

impl Drop for ProgressListener {
    fn drop(&mut self) {
        #[cfg(unix)]
        if let Self::Unix(_, path) = self {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Destination for periodic search status
pub enum ProgressSink {
    /// Reporting disabled
    Silent,
    /// Non-blocking datagrams to a listener
    Datagram { name: String, socket: DatagramTarget },
    /// Terminal spinner on stderr
    Spinner(ProgressBar),
}

impl ProgressSink {
    /// Open a datagram sink for `address`
    ///
    /// # Errors
    /// Returns `Io` if no socket can be created, `Configuration` if the host
    /// does not resolve.
    pub fn connect(address: &ProgressAddress) -> Result<Self> {
        let socket = match address {
            #[cfg(unix)]
            ProgressAddress::Unix { path, .. } => {
                let socket = UnixDatagram::unbound()?;
                socket.set_nonblocking(true)?;
                DatagramTarget::Unix(socket, path.clone())
            }
            #[cfg(not(unix))]
            ProgressAddress::Unix { .. } => {
                return Err(MastermindError::Configuration(
                    "unix progress sockets are not supported on this platform".to_string(),
                ));
            }
            ProgressAddress::Ip { host, port, .. } => {
                let target = ProgressAddress::resolve(host, *port)?;
                let local: SocketAddr = if target.is_ipv4() {
                    ([0, 0, 0, 0], 0).into()
                } else {
                    ([0u16; 8], 0).into()
                };
                let socket = UdpSocket::bind(local)?;
                socket.set_nonblocking(true)?;
                DatagramTarget::Udp(socket, target)
            }
        };

        Ok(Self::Datagram {
            name: address.id().to_string(),
            socket,
        })
    }

    /// Spinner that shows the outermost search node
    #[must_use]
    pub fn spinner() -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Self::Spinner(pb)
    }

    /// Publish the status chain, innermost node first
    pub fn report(&self, total: u64, frames: &[StatusFrame]) {
        match self {
            Self::Silent => {}
            Self::Datagram { name, socket } => {
                let msg = make_message(total, name, frames);
                let sent = match socket {
                    #[cfg(unix)]
                    DatagramTarget::Unix(s, path) => s.send_to(&msg, path),
                    DatagramTarget::Udp(s, addr) => s.send_to(&msg, addr),
                };
                if let Err(e) = sent {
                    trace!("progress send failed: {e}");
                }
            }
            Self::Spinner(pb) => {
                let root = frames.last().map(ToString::to_string).unwrap_or_default();
                pb.set_message(format!("entries={total} depth={} {root}", frames.len()));
            }
        }
    }

    /// Clear any terminal output
    pub fn finish(&self) {
        if let Self::Spinner(pb) = self {
            pb.finish_and_clear();
        }
    }
}

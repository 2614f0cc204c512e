//! Connection endpoints
//!
//! The local and remote address of a session, captured once at accept time.

use crate::resolver::HostnameResolver;
use std::net::{IpAddr, SocketAddr};

/// One side of a connection: address, port and reverse-DNS name.
///
/// The hostname is empty when the lookup found nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    addr: SocketAddr,
    hostname: String,
}

impl Endpoint {
    pub fn new(addr: SocketAddr, hostname: impl Into<String>) -> Self {
        Self {
            addr,
            hostname: hostname.into(),
        }
    }

    /// Looks up the reverse-DNS name for `addr`. A failed lookup leaves the
    /// hostname empty.
    pub async fn resolve(addr: SocketAddr, resolver: &dyn HostnameResolver) -> Self {
        let hostname = resolver.reverse_lookup(addr.ip()).await.unwrap_or_default();
        Self { addr, hostname }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn ip(&self) -> IpAddr {
        self.addr.ip()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }
}

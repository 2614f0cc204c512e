//! Reverse DNS lookups
//!
//! Endpoint hostnames come from a [`HostnameResolver`]. A lookup that finds
//! nothing is not an error; the hostname is simply left empty.

use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::net::IpAddr;
use trust_dns_resolver::TokioAsyncResolver;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};

#[async_trait]
pub trait HostnameResolver: Send + Sync {
    /// Returns the PTR name for `ip`, or `None` if there is none.
    async fn reverse_lookup(&self, ip: IpAddr) -> Option<String>;
}

/// Resolver backed by the system DNS configuration.
pub struct DnsResolver {
    resolver: TokioAsyncResolver,
}

impl DnsResolver {
    /// Uses the system resolver configuration, or the library defaults when
    /// it cannot be read.
    pub fn from_system_conf() -> Self {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
            debug!("System resolver configuration unavailable ({}), using defaults", e);
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Self { resolver }
    }
}

#[async_trait]
impl HostnameResolver for DnsResolver {
    async fn reverse_lookup(&self, ip: IpAddr) -> Option<String> {
        match self.resolver.reverse_lookup(ip).await {
            Ok(lookup) => lookup
                .iter()
                .next()
                .map(|name| name.to_string().trim_end_matches('.').to_string()),
            Err(e) => {
                debug!("Reverse lookup for {} failed: {}", ip, e);
                None
            }
        }
    }
}

/// Never resolves anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReverseDns;

#[async_trait]
impl HostnameResolver for NoReverseDns {
    async fn reverse_lookup(&self, _ip: IpAddr) -> Option<String> {
        None
    }
}

/// Answers from a fixed table.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    names: HashMap<IpAddr, String>,
}

impl StaticResolver {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (IpAddr, S)>,
        S: Into<String>,
    {
        Self {
            names: entries
                .into_iter()
                .map(|(ip, name)| (ip, name.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl HostnameResolver for StaticResolver {
    async fn reverse_lookup(&self, ip: IpAddr) -> Option<String> {
        self.names.get(&ip).cloned()
    }
}

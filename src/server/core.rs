use log::{debug, error, info, warn};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::{JoinError, JoinSet};

use crate::config::ServerConfig;
use crate::connection::{Connection, SessionEnd};
use crate::error::ServerError;
use crate::protocol::{ReplyCode, Response};
use crate::resolver::HostnameResolver;
use crate::server::ServerContext;
use crate::session::Endpoint;

/// Outcome of one session task, reaped by the accept loop.
#[derive(Debug)]
pub struct SessionReport {
    pub peer: SocketAddr,
    pub outcome: io::Result<SessionEnd>,
}

/// Totals gathered while the server ran.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServeSummary {
    /// Sessions that ran to completion, cleanly or not
    pub sessions: usize,
    /// Sessions that ended in a transport error or panicked
    pub faulted: usize,
    /// Connections turned away at the connection limit
    pub refused: usize,
}

impl ServeSummary {
    fn record(&mut self, joined: Result<SessionReport, JoinError>) {
        self.sessions += 1;
        match joined {
            Ok(SessionReport {
                peer,
                outcome: Ok(end),
            }) => {
                info!("Session {} finished ({:?})", peer, end);
            }
            Ok(SessionReport {
                peer,
                outcome: Err(e),
            }) => {
                self.faulted += 1;
                warn!("Session {} faulted: {}", peer, e);
            }
            Err(e) => {
                self.faulted += 1;
                error!("Session task failed: {}", e);
            }
        }
    }
}

pub struct Server {
    listener: TcpListener,
    context: Arc<ServerContext>,
    resolver: Arc<dyn HostnameResolver>,
    max_connections: usize,
}

impl Server {
    pub async fn bind(
        config: &ServerConfig,
        context: ServerContext,
        resolver: Arc<dyn HostnameResolver>,
    ) -> Result<Self, ServerError> {
        config.validate()?;
        let address = config.listen_address();
        let listener = match TcpListener::bind(&address).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind to {}: {}", address, e);
                return Err(e.into());
            }
        };
        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self::from_listener(
            listener,
            context,
            resolver,
            config.max_connections,
        ))
    }

    pub fn from_listener(
        listener: TcpListener,
        context: ServerContext,
        resolver: Arc<dyn HostnameResolver>,
        max_connections: usize,
    ) -> Self {
        Self {
            listener,
            context: Arc::new(context),
            resolver,
            max_connections,
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until `shutdown` resolves, then waits for the
    /// sessions still in flight.
    ///
    /// Every session runs in its own task owned by a `JoinSet`, so its
    /// outcome is always observed here: finished tasks are reaped while
    /// accepting and the rest are drained after shutdown.
    pub async fn run_until<F>(self, shutdown: F) -> ServeSummary
    where
        F: Future,
    {
        info!(
            "Starting vsmtpd on {} (max {} sessions)",
            self.local_addr()
                .map(|addr| addr.to_string())
                .unwrap_or_else(|_| "unknown address".to_string()),
            self.max_connections
        );

        let mut sessions = JoinSet::new();
        let mut summary = ServeSummary::default();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested; no longer accepting connections");
                    break;
                }
                Some(joined) = sessions.join_next(), if !sessions.is_empty() => {
                    summary.record(joined);
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        if sessions.len() >= self.max_connections {
                            warn!("Refusing {}: {} sessions active", peer, sessions.len());
                            refuse(stream).await;
                            summary.refused += 1;
                            continue;
                        }

                        let context = Arc::clone(&self.context);
                        let resolver = Arc::clone(&self.resolver);
                        sessions.spawn(serve_connection(stream, peer, context, resolver));
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                    }
                },
            }
        }

        if !sessions.is_empty() {
            info!("Waiting for {} active sessions", sessions.len());
        }
        while let Some(joined) = sessions.join_next().await {
            summary.record(joined);
        }

        info!(
            "Server stopped: {} sessions, {} faulted, {} refused",
            summary.sessions, summary.faulted, summary.refused
        );
        summary
    }
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    context: Arc<ServerContext>,
    resolver: Arc<dyn HostnameResolver>,
) -> SessionReport {
    let outcome = run_session(stream, peer, context, resolver).await;
    SessionReport { peer, outcome }
}

async fn run_session(
    stream: TcpStream,
    peer: SocketAddr,
    context: Arc<ServerContext>,
    resolver: Arc<dyn HostnameResolver>,
) -> io::Result<SessionEnd> {
    let local = Endpoint::resolve(stream.local_addr()?, resolver.as_ref()).await;
    let remote = Endpoint::resolve(peer, resolver.as_ref()).await;

    let session = context.new_session(local, remote);
    info!(
        "Accepted connection from {} ({}) on {}",
        peer,
        session.remote().hostname(),
        session.local().addr()
    );
    Connection::new(stream, session, context).run().await
}

async fn refuse(mut stream: TcpStream) {
    let response = Response::new(
        ReplyCode::SERVICE_UNAVAILABLE,
        "Too many connections, try again later",
    );
    if let Err(e) = stream.write_all(response.encode().as_bytes()).await {
        debug!("Sending refusal failed: {}", e);
    }
    if let Err(e) = stream.shutdown().await {
        debug!("Closing refused connection failed: {}", e);
    }
}

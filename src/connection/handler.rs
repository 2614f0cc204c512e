use log::{debug, info, warn};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf};

use crate::commands::handlers::banner;
use crate::error::{error_response, internal_error};
use crate::modes::{LineHandler, line_too_long};
use crate::protocol::{Frame, LineReader, Response, ResponseWriter, parse_command};
use crate::server::ServerContext;
use crate::session::{Session, SessionState};

/// How a session ended when the transport did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// A reply carried the disconnect flag.
    Quit,
    /// The client closed the stream.
    PeerClosed,
}

/// Drives one accepted connection from banner to disconnect.
///
/// - Sends the 220 banner before reading anything.
/// - Reads one line at a time and interprets it according to the session
///   state: commands go through the registry, data and authentication lines
///   go to their mode handlers.
/// - Writes each reply in full before reading the next line.
/// - On exit, flushes and closes the transport whatever the cause.
pub struct Connection<R, W> {
    reader: LineReader<R>,
    writer: ResponseWriter<W>,
    session: Session,
    context: Arc<ServerContext>,
}

impl<S> Connection<ReadHalf<S>, WriteHalf<S>>
where
    S: AsyncRead + AsyncWrite,
{
    pub fn new(stream: S, session: Session, context: Arc<ServerContext>) -> Self {
        let (read_half, write_half) = tokio::io::split(stream);
        Self::from_parts(read_half, write_half, session, context)
    }
}

impl<R, W> Connection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn from_parts(reader: R, writer: W, session: Session, context: Arc<ServerContext>) -> Self {
        let max_line_length = context.max_line_length();
        Self {
            reader: LineReader::new(reader, max_line_length),
            writer: ResponseWriter::new(writer),
            session,
            context,
        }
    }

    /// Runs the session to completion.
    ///
    /// Returns an error only for transport faults; protocol problems are
    /// answered on the wire and the session carries on.
    pub async fn run(mut self) -> io::Result<SessionEnd> {
        let peer = self.session.remote().addr();
        let result = self.serve().await;

        if let Err(e) = self.writer.close().await {
            debug!("Closing connection to {} failed: {}", peer, e);
        }
        if let Some(transaction) = self.session.detach_transaction() {
            debug!("Discarding unfinished transaction from {}", transaction.sender());
        }

        match &result {
            Ok(end) => info!("Connection from {} ended: {:?}", peer, end),
            Err(e) => warn!("Connection from {} failed: {}", peer, e),
        }
        result
    }

    async fn serve(&mut self) -> io::Result<SessionEnd> {
        let greeting = banner(&self.session);
        self.session.set_state(SessionState::CommandReady);
        self.writer.send(Some(&greeting)).await?;

        loop {
            let Some(frame) = self.reader.next_frame().await? else {
                return Ok(SessionEnd::PeerClosed);
            };

            let response = self.process(frame);
            self.writer.send(response.as_ref()).await?;

            if response.as_ref().is_some_and(Response::is_disconnect) {
                return Ok(SessionEnd::Quit);
            }
        }
    }

    fn process(&mut self, frame: Frame) -> Option<Response> {
        match self.session.state() {
            SessionState::CommandReady => Some(match frame {
                Frame::Line(line) => self.execute(&line),
                Frame::Overlong => line_too_long(),
            }),
            SessionState::Greeting => {
                warn!(
                    "Line from {} arrived before the banner was sent",
                    self.session.remote().addr()
                );
                Some(internal_error())
            }
            SessionState::DataTransfer => {
                feed(self.context.data_handler(), &mut self.session, frame)
            }
            SessionState::Authenticating => {
                feed(self.context.auth_handler(), &mut self.session, frame)
            }
        }
    }

    /// Parses and dispatches one command line; always yields a reply.
    fn execute(&mut self, line: &str) -> Response {
        debug!("< {}", line);

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => return error_response(&e),
        };

        match self
            .context
            .commands()
            .dispatch(&command.verb, command.args, &mut self.session)
        {
            Ok(Some(response)) => response,
            Ok(None) => {
                warn!("Command {} produced no reply", command.verb);
                internal_error()
            }
            Err(e) => error_response(&e),
        }
    }
}

fn feed(handler: &dyn LineHandler, session: &mut Session, frame: Frame) -> Option<Response> {
    match frame {
        Frame::Line(line) => match handler.handle_line(session, &line) {
            Ok(response) => response,
            Err(e) => Some(error_response(&e)),
        },
        Frame::Overlong => handler.handle_overlong(session),
    }
}

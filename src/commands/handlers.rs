//! Built-in SMTP command handlers.
//!
//! Each handler enforces its own preconditions and answers protocol
//! violations with a negative reply rather than an error.

use crate::commands::{CommandHandler, HandlerResult};
use crate::protocol::{ReplyCode, Response};
use crate::session::{HeloVerb, Session, SessionState, Transaction};
use log::info;

const ALREADY_GREETED: &str = "But you already said HELO...";

fn greeting_text(session: &Session) -> String {
    format!(
        "{} Hi {} [{}]; I am so happy to meet you.",
        session.hostname(),
        session.remote().hostname(),
        session.remote().ip()
    )
}

/// Banner sent as soon as a connection is accepted.
pub fn banner(session: &Session) -> Response {
    Response::new(ReplyCode::SERVICE_READY, format!("{} ESMTP", session.hostname()))
}

/// HELO: plain greeting.
pub fn helo(session: &mut Session, args: &str) -> HandlerResult {
    if !session.accept_greeting(HeloVerb::Helo, args) {
        return Ok(Some(Response::new(ReplyCode::BAD_SEQUENCE, ALREADY_GREETED)));
    }
    info!("{} from {} ({})", HeloVerb::Helo, args, session.remote().ip());
    Ok(Some(Response::new(ReplyCode::OK, greeting_text(session))))
}

/// EHLO: extended greeting advertising the capabilities, one per line.
#[derive(Debug, Clone, Copy)]
pub struct Ehlo {
    size_limit: u64,
}

impl Ehlo {
    pub fn new(size_limit: u64) -> Self {
        Self { size_limit }
    }

    fn capabilities(&self) -> Vec<String> {
        vec![format!("SIZE {}", self.size_limit)]
    }
}

impl CommandHandler for Ehlo {
    fn handle(&self, session: &mut Session, args: &str) -> HandlerResult {
        if !session.accept_greeting(HeloVerb::Ehlo, args) {
            return Ok(Some(Response::new(ReplyCode::BAD_SEQUENCE, ALREADY_GREETED)));
        }
        info!("{} from {} ({})", HeloVerb::Ehlo, args, session.remote().ip());

        let mut lines = vec![greeting_text(session)];
        lines.extend(self.capabilities());
        Ok(Some(Response::multiline(ReplyCode::OK, lines)))
    }
}

/// MAIL: starts a transaction for the given sender.
pub fn mail(session: &mut Session, args: &str) -> HandlerResult {
    if !session.is_greeted() {
        return Ok(Some(Response::new(
            ReplyCode::BAD_SEQUENCE,
            "Manners? You haven't said hello...",
        )));
    }

    info!("Mail from {}", args);
    session.attach_transaction(Transaction::new(args));

    Ok(Some(Response::new(
        ReplyCode::OK,
        format!("{} sender OK - how exciting to get mail from you!", args),
    )))
}

/// RCPT: relaying is never permitted.
pub fn rcpt(session: &mut Session, args: &str) -> HandlerResult {
    if !session.is_greeted() {
        return Ok(Some(Response::new(ReplyCode::BAD_SEQUENCE, "Use MAIL before RCPT")));
    }

    info!("Refusing recipient {}", args);
    Ok(Some(Response::new(ReplyCode::MAILBOX_UNAVAILABLE, "Relaying denied")))
}

/// DATA: switches the session to message data.
pub fn data(session: &mut Session, _args: &str) -> HandlerResult {
    session.set_state(SessionState::DataTransfer);
    Ok(Some(Response::new(ReplyCode::START_DATA, "go ahead")))
}

/// RSET: drops the transaction in progress.
pub fn rset(session: &mut Session, _args: &str) -> HandlerResult {
    session.detach_transaction();
    Ok(Some(Response::new(ReplyCode::OK, "OK")))
}

/// VRFY: there is no address database, so no reply is produced.
pub fn vrfy(_session: &mut Session, _args: &str) -> HandlerResult {
    Ok(None)
}

pub fn noop(_session: &mut Session, _args: &str) -> HandlerResult {
    Ok(Some(Response::new(ReplyCode::OK, "OK")))
}

/// QUIT: says goodbye and ends the session.
pub fn quit(session: &mut Session, _args: &str) -> HandlerResult {
    Ok(Some(
        Response::new(
            ReplyCode::CLOSING,
            format!("{} closing connection. Have a wonderful day.", session.hostname()),
        )
        .disconnecting(),
    ))
}

//! SMTP wire protocol
//!
//! Line framing, command line parsing and reply encoding.

pub mod parser;
pub mod reader;
pub mod response;
pub mod writer;

pub use parser::{CommandLine, parse_command};
pub use reader::{Frame, LineReader};
pub use response::{ReplyCode, Response};
pub use writer::ResponseWriter;

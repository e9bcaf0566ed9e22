//! Display formatting for received chat lines.
//!
//! Lines arrive as `sender::kind::body`. Server-originated lines always start
//! with `server::server::notice::` or `server::server::help::`.

use irori_shared::time::timestamp_to_jst_clock;

const NOTICE_PREFIX: &str = "server::server::notice::";
const HELP_PREFIX: &str = "server::server::help::";
const CHAT_SEPARATOR: &str = "::chat::";

/// A received line, split by kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming<'a> {
    Chat { sender: &'a str, body: &'a str },
    /// Join / leave / rename notices
    Notice(&'a str),
    /// Replies to commands sent by this client
    Help(&'a str),
    /// Anything that does not follow the line format
    Raw(&'a str),
}

impl<'a> Incoming<'a> {
    pub fn parse(line: &'a str) -> Self {
        if let Some(body) = line.strip_prefix(NOTICE_PREFIX) {
            Incoming::Notice(body)
        } else if let Some(body) = line.strip_prefix(HELP_PREFIX) {
            Incoming::Help(body)
        } else if let Some((sender, body)) = line.split_once(CHAT_SEPARATOR) {
            Incoming::Chat { sender, body }
        } else {
            Incoming::Raw(line)
        }
    }
}

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a received line, prefixed with the local receive time (JST)
    pub fn format_line(line: &str, received_at: i64) -> String {
        let clock = timestamp_to_jst_clock(received_at);
        match Incoming::parse(line) {
            Incoming::Chat { sender, body } => format!("\n[{}] @{}: {}\n", clock, sender, body),
            Incoming::Notice(body) => format!("\n[{}] * {}\n", clock, body),
            Incoming::Help(body) => format!("\n[{}] (server) {}\n", clock, body),
            Incoming::Raw(text) => format!("\n[{}] ← {}\n", clock, text),
        }
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }
}

//! From implementations for converting between error types.
//!
//! `reqwest::Error` is opaque about *why* a request failed, so the transport
//! error is classified here by its flags and by the text of its source chain.

use crate::error::{ConfigValidationError, Error, NetworkError, ParseError};
use lazy_static::lazy_static;
use regex::Regex;
use std::error::Error as StdError;

/// Maximum length for error messages to prevent memory bloat from large HTTP responses.
pub(crate) const MAX_ERROR_MESSAGE_LEN: usize = 1024;

lazy_static! {
    /// Peer hung up before a status line arrived.
    static ref NO_RESPONSE_PATTERN: Regex = Regex::new(
        r"(?i)connection closed before message completed|incomplete ?message|empty reply from server|unexpected eof|unexpected end of file"
    ).expect("Invalid no-response regex pattern");

    /// Handshake and certificate validation failures.
    static ref TLS_HANDSHAKE_PATTERN: Regex = Regex::new(
        r"(?i)handshake|invalid peer certificate|certificate verify failed|unknown ?issuer|bad ?certificate"
    ).expect("Invalid TLS handshake regex pattern");

    /// Resolver failures across platforms.
    static ref DNS_PATTERN: Regex = Regex::new(
        r"(?i)dns error|failed to lookup address|name or service not known|no such host|nodename nor servname|temporary failure in name resolution"
    ).expect("Invalid DNS regex pattern");

    /// Any remaining TLS layer error.
    static ref TLS_PATTERN: Regex = Regex::new(r"(?i)\b(tls|ssl|rustls)\b")
        .expect("Invalid TLS regex pattern");
}

/// Truncates a string to a maximum length, adding "... (truncated)" if needed.
pub(crate) fn truncate_message(mut msg: String) -> String {
    if msg.len() > MAX_ERROR_MESSAGE_LEN {
        let mut cut = MAX_ERROR_MESSAGE_LEN;
        while !msg.is_char_boundary(cut) {
            cut -= 1;
        }
        msg.truncate(cut);
        msg.push_str("... (truncated)");
    }
    msg
}

/// Renders an error and all of its sources as one `a: b: c` line.
pub(crate) fn chain_text(err: &(dyn StdError + 'static)) -> String {
    let mut text = err.to_string();
    let mut current = err.source();
    while let Some(source) = current {
        text.push_str(": ");
        text.push_str(&source.to_string());
        current = source.source();
    }
    text
}

fn io_kind_in_chain(err: &(dyn StdError + 'static)) -> Option<std::io::ErrorKind> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            return Some(io.kind());
        }
        current = e.source();
    }
    None
}

/// Classifies a transport failure from its message chain and I/O kind.
///
/// Split out from the `reqwest` conversion so the patterns can be tested
/// without a live socket.
pub(crate) fn classify_transport(
    chain: &str,
    io_kind: Option<std::io::ErrorKind>,
    is_timeout: bool,
    is_connect: bool,
) -> Option<NetworkError> {
    if is_timeout || io_kind == Some(std::io::ErrorKind::TimedOut) {
        return Some(if is_connect {
            NetworkError::ConnectTimeout
        } else {
            NetworkError::Timeout
        });
    }
    if NO_RESPONSE_PATTERN.is_match(chain) || io_kind == Some(std::io::ErrorKind::UnexpectedEof) {
        return Some(NetworkError::NoResponse(truncate_message(chain.to_string())));
    }
    if TLS_HANDSHAKE_PATTERN.is_match(chain) {
        return Some(NetworkError::TlsHandshake(truncate_message(chain.to_string())));
    }
    if DNS_PATTERN.is_match(chain) {
        return Some(NetworkError::DnsResolution(truncate_message(chain.to_string())));
    }
    if TLS_PATTERN.is_match(chain) {
        return Some(NetworkError::Ssl(truncate_message(chain.to_string())));
    }
    if is_connect || io_kind.is_some() {
        return Some(NetworkError::ConnectionFailed(truncate_message(
            chain.to_string(),
        )));
    }
    None
}

impl From<NetworkError> for Error {
    fn from(e: NetworkError) -> Self {
        Error::Network(Box::new(e))
    }
}

impl From<Box<NetworkError>> for Error {
    fn from(e: Box<NetworkError>) -> Self {
        Error::Network(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(Box::new(e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(Box::new(ParseError::Json(e)))
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::Config(ConfigValidationError::invalid("url", e.to_string()))
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(e: reqwest::Error) -> Self {
        let chain = chain_text(&e);
        let io_kind = io_kind_in_chain(&e);
        let classified = classify_transport(
            &chain,
            io_kind,
            e.is_timeout(),
            e.is_connect(),
        );
        match classified {
            Some(network_error) => network_error,
            None if e.is_request() || e.is_body() => {
                NetworkError::ConnectionFailed(truncate_message(chain))
            }
            None => NetworkError::Transport(Box::new(e)),
        }
    }
}

impl NetworkError {
    /// Classifies a failure while reading the entity, after the status line
    /// arrived.
    ///
    /// The request reached the server, so a truncated body is never
    /// [`NetworkError::NoResponse`].
    pub(crate) fn from_body_read(e: &reqwest::Error) -> Self {
        if e.is_timeout() || io_kind_in_chain(e) == Some(std::io::ErrorKind::TimedOut) {
            return NetworkError::Timeout;
        }
        NetworkError::ConnectionFailed(truncate_message(format!(
            "response body read failed: {}",
            chain_text(e)
        )))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Network(Box::new(NetworkError::from(e)))
    }
}

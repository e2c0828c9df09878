//! Error types for `dogstatsd` module

use std::net::SocketAddr;

/// Errors for the functions [`crate::dogstatsd::message::Message::parse`]
/// and friends.
///
/// A parse error never leaves the validator, it is converted into an
/// [`crate::dogstatsd::validator::Outcome::Invalid`].
#[derive(Debug, thiserror::Error, Clone, Copy, Eq, PartialEq)]
pub enum ParseError {
    /// Parse failure given in text
    #[error("parse failure: {0}")]
    Raw(&'static str),
}

/// Failures of the UDP listener. Both variants are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// The socket could not be bound, e.g. the address is in use.
    #[error("couldn't bind to address {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// Reading from the bound socket failed.
    #[error("couldn't receive from socket {addr:?}: {source}")]
    Transport {
        addr: Option<SocketAddr>,
        #[source]
        source: std::io::Error,
    },
}

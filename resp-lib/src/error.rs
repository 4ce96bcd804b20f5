//! Error types shared by the transport, the codec and the clients.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The transport could not be established (refused, DNS, timeout).
    ///
    /// `target` is the connection name when one was configured, the host otherwise.
    #[error("Failed to connect to [ {target} ]. {source}")]
    ConnectFailure {
        target: String,
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// A read or write did not complete after the connection was established.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The server sent something that is not a valid reply. The read position
    /// of the stream is undefined afterwards.
    #[error("{0}")]
    ProtocolFailure(String),

    /// An error reply from the server, forwarded verbatim.
    #[error("{0}")]
    Server(String),

    /// The call name does not resolve to any command token.
    #[error("invalid command name [ {0} ]")]
    InvalidCommand(String),

    /// The blocking client could not build its runtime.
    #[error("failed to start the client runtime: {0}")]
    Runtime(#[source] io::Error),
}

impl Error {
    pub(crate) fn protocol(msg: impl Into<String>) -> Error {
        Error::ProtocolFailure(msg.into())
    }

    /// `true` when the connection that produced this error can still be used.
    ///
    /// Only server error replies leave the stream at a reply boundary.
    pub fn is_connection_usable(&self) -> bool {
        matches!(self, Error::Server(_))
    }
}

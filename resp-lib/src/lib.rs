//! A RESP client for Redis compatible stores.
//!
//! The major components are:
//! * `transport`: moves bytes over a single connection (lines and sized payloads).
//! * `codec`: encodes requests and parses replies.
//! * `cmd`: command token lists, call name resolution and typed commands.
//! * `frame`: the [`Reply`] value of a single server reply.
//! * `clients`: the async [`Client`] and the [`BlockingClient`].
//!
//! ```no_run
//! use resp_lib::{BlockingClient, ConnectionConfig, Reply};
//!
//! # fn main() -> resp_lib::Result<()> {
//! let config = ConnectionConfig::new("127.0.0.1", 6379).with_database(1);
//! let mut client = BlockingClient::connect(config)?;
//!
//! client.invoke("set", &["x".into(), 0.into()])?;
//! assert_eq!(client.invoke("configRewrite", &[])?, Reply::Status("OK".into()));
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]

pub mod clients;
pub use clients::{BlockingClient, Client};

pub mod cmd;
pub use cmd::{Arg, Command};

pub mod codec;

pub mod config;
pub use config::{ConnectOptions, ConnectionConfig};

mod error;
pub use error::{Error, Result};

pub mod frame;
pub use frame::Reply;

pub mod transport;
pub use transport::Transport;

/// Default port that a redis server listens on.
pub const DEFAULT_PORT: u16 = 6379;

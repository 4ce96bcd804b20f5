//! Redis client implementation
//!
//! Provides an async connect and methods for issuing commands.

use crate::cmd::{Arg, Command, Del, Get, Ping, Protocol, Set};
use crate::config::{ConnectOptions, ConnectionConfig};
use crate::transport::Transport;
use crate::{codec, Reply, Result};
use bytes::Bytes;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, instrument};

/// Backed by a single `Transport`, executing one command at a time.
///
/// Every method takes `&mut self`, so a request and its reply can never be
/// interleaved with another request on the same connection. Callers sharing a
/// client between tasks must wrap it in a mutex.
#[derive(Debug)]
pub struct Client<S = TcpStream> {
    transport: Transport<S>,
}

impl Client {
    /// Connect to the server described by `config` and set the connection up.
    ///
    /// See [`Client::with_transport`] for the commands issued before the
    /// client is returned.
    pub async fn connect(config: ConnectionConfig) -> Result<Client> {
        let transport = Transport::open(&config).await?;

        Client::with_transport(transport, config.options()).await
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Client<S> {
    /// Set up a client over an established transport.
    ///
    /// In order, each a full round trip:
    ///
    /// 1. `CLIENT SETNAME <name>` if a name is configured.
    /// 2. `AUTH <password>` if a password is configured.
    /// 3. `SELECT <database>` if the database is not `0`, the server default.
    ///
    /// Any error reply fails the whole construction.
    #[instrument(skip(transport))]
    pub async fn with_transport(transport: Transport<S>, options: &ConnectOptions) -> Result<Client<S>> {
        let mut client = Client { transport };

        if let Some(name) = &options.name {
            client.invoke("clientSetname", &[name.into()]).await?;
        }

        if let Some(password) = &options.password {
            client.invoke("auth", &[password.into()]).await?;
        }

        if options.database != 0 {
            client.select(options.database).await?;
        }

        debug!("connection ready");

        Ok(client)
    }

    /// Run the command named by `name` with `args`.
    ///
    /// `name` is a lower-camel call name: `set` runs `SET`, `configRewrite`
    /// runs `CONFIG REWRITE` and `clusterSetConfigEpoch` runs
    /// `CLUSTER SET-CONFIG-EPOCH`.
    ///
    /// # Errors
    ///
    /// An error reply from the server is returned as
    /// [`Error::Server`](crate::Error::Server); the client stays usable.
    #[instrument(skip(self, args))]
    pub async fn invoke(&mut self, name: &str, args: &[Arg]) -> Result<Reply> {
        let cmd = Command::from_call(name, args)?;

        self.execute(cmd).await
    }

    /// Send an already built command and read its reply.
    ///
    /// If the reply cannot be read the connection is closed, as its read
    /// position is no longer known. Later calls fail with an I/O error.
    pub async fn execute(&mut self, cmd: impl Protocol) -> Result<Reply> {
        let cmd = cmd.into_command();

        match codec::exchange(&mut self.transport, &cmd).await {
            Err(err) if !err.is_connection_usable() => {
                self.transport.close().await?;
                Err(err)
            }
            res => res,
        }
    }

    /// [Ping] the server.
    ///
    /// [Ping]: crate::cmd::Ping
    #[instrument(skip(self))]
    pub async fn ping(&mut self, msg: Option<Bytes>) -> Result<Bytes> {
        match self.execute(Ping::new(msg)).await? {
            Reply::Status(value) => Ok(value.into()),
            Reply::Bulk(Some(value)) => Ok(value),
            reply => Err(reply.to_error()),
        }
    }

    /// Get the value of key.
    ///
    /// # return
    ///
    /// If the key does not exist the special value `None` is returned.
    #[instrument(skip(self))]
    pub async fn get(&mut self, key: &str) -> Result<Option<Bytes>> {
        match self.execute(Get::new(key)).await? {
            Reply::Status(value) => Ok(Some(value.into())),
            Reply::Bulk(value) => Ok(value),
            reply => Err(reply.to_error()),
        }
    }

    /// Set `key` to hold the given `value`.
    ///
    /// If key already holds a value, it is overwritten. Any previous time to
    /// live associated with the key is discarded on successful SET operation.
    #[instrument(skip(self))]
    pub async fn set(&mut self, key: &str, value: Bytes) -> Result<()> {
        self.set_cmd(Set::new(key, value, None)).await
    }

    /// Set `key` to hold the given `value`. The value expires after `expiration`.
    #[instrument(skip(self))]
    pub async fn set_expires(&mut self, key: &str, value: Bytes, expiration: Duration) -> Result<()> {
        self.set_cmd(Set::new(key, value, Some(expiration))).await
    }

    async fn set_cmd(&mut self, cmd: Set) -> Result<()> {
        match self.execute(cmd).await? {
            Reply::Status(s) if s == "OK" => Ok(()),
            reply => Err(reply.to_error()),
        }
    }

    /// Remove `keys`, returning how many existed.
    #[instrument(skip(self))]
    pub async fn del(&mut self, keys: &[&str]) -> Result<i64> {
        let keys = keys.iter().map(ToString::to_string).collect();

        match self.execute(Del::new(keys)).await? {
            Reply::Integer(n) => Ok(n),
            reply => Err(reply.to_error()),
        }
    }

    /// Switch the connection to another database.
    #[instrument(skip(self))]
    pub async fn select(&mut self, database: u32) -> Result<()> {
        match self.invoke("select", &[database.into()]).await? {
            Reply::Status(_) => Ok(()),
            reply => Err(reply.to_error()),
        }
    }

    /// Close the connection.
    pub async fn close(mut self) -> Result<()> {
        self.transport.close().await
    }
}

//! Connection settings consumed when a client is created.

use crate::DEFAULT_PORT;
use std::time::Duration;

/// Where to connect and how to set the connection up.
///
/// Built with the consuming `with_*` methods and then handed to
/// [`Client::connect`](crate::Client::connect); it is not changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    options: ConnectOptions,
}

/// The optional part of a [`ConnectionConfig`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Sent with `AUTH` right after connecting.
    pub password: Option<String>,
    /// Selected with `SELECT` unless it is `0`, the server default.
    pub database: u32,
    /// Sent with `CLIENT SETNAME`; also used in connect failure messages.
    pub name: Option<String>,
    /// Bound on establishing the connection. `None` waits as long as the OS does.
    pub timeout: Option<Duration>,
    /// Keep the socket alive between uses (TCP keep-alive).
    pub persistent: bool,
}

impl ConnectionConfig {
    pub fn new(host: impl ToString, port: u16) -> ConnectionConfig {
        ConnectionConfig {
            host: host.to_string(),
            port,
            options: ConnectOptions::default(),
        }
    }

    pub fn with_password(mut self, password: impl ToString) -> ConnectionConfig {
        self.options.password = Some(password.to_string());
        self
    }

    pub fn with_database(mut self, database: u32) -> ConnectionConfig {
        self.options.database = database;
        self
    }

    pub fn with_name(mut self, name: impl ToString) -> ConnectionConfig {
        self.options.name = Some(name.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> ConnectionConfig {
        self.options.timeout = Some(timeout);
        self
    }

    pub fn with_persistent(mut self, persistent: bool) -> ConnectionConfig {
        self.options.persistent = persistent;
        self
    }

    pub fn with_options(mut self, options: ConnectOptions) -> ConnectionConfig {
        self.options = options;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    /// `host:port`, suitable for address resolution.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The connection name if one is set, otherwise the host.
    pub fn target(&self) -> &str {
        self.options.name.as_deref().unwrap_or(&self.host)
    }
}

impl Default for ConnectionConfig {
    fn default() -> ConnectionConfig {
        ConnectionConfig::new("127.0.0.1", DEFAULT_PORT)
    }
}

// Hand written so the password never ends up in logs.
impl std::fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .field("persistent", &self.persistent)
            .finish()
    }
}

//! A blocking client.
//!
//! Wraps the async [`Client`] and a current-thread runtime, so every call
//! blocks the calling thread until its reply has been read.

use crate::clients::Client;
use crate::cmd::{Arg, Protocol};
use crate::config::ConnectionConfig;
use crate::{Error, Reply, Result};
use bytes::Bytes;
use std::time::Duration;
use tokio::runtime::{self, Runtime};

/// Synchronous counterpart of [`Client`].
///
/// Must not be used from within an async context: the calls block on the
/// client's own runtime.
pub struct BlockingClient {
    // Declared before `rt` so the connection is released while the runtime
    // is still alive.
    inner: Client,
    rt: Runtime,
}

impl BlockingClient {
    /// Connect and set the connection up. See [`Client::connect`].
    pub fn connect(config: ConnectionConfig) -> Result<BlockingClient> {
        let rt = runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;

        let inner = rt.block_on(Client::connect(config))?;

        Ok(BlockingClient { inner, rt })
    }

    /// See [`Client::invoke`].
    pub fn invoke(&mut self, name: &str, args: &[Arg]) -> Result<Reply> {
        self.rt.block_on(self.inner.invoke(name, args))
    }

    /// See [`Client::execute`].
    pub fn execute(&mut self, cmd: impl Protocol) -> Result<Reply> {
        self.rt.block_on(self.inner.execute(cmd))
    }

    pub fn ping(&mut self, msg: Option<Bytes>) -> Result<Bytes> {
        self.rt.block_on(self.inner.ping(msg))
    }

    pub fn get(&mut self, key: &str) -> Result<Option<Bytes>> {
        self.rt.block_on(self.inner.get(key))
    }

    pub fn set(&mut self, key: &str, value: Bytes) -> Result<()> {
        self.rt.block_on(self.inner.set(key, value))
    }

    pub fn set_expires(&mut self, key: &str, value: Bytes, expiration: Duration) -> Result<()> {
        self.rt.block_on(self.inner.set_expires(key, value, expiration))
    }

    pub fn del(&mut self, keys: &[&str]) -> Result<i64> {
        self.rt.block_on(self.inner.del(keys))
    }

    pub fn select(&mut self, database: u32) -> Result<()> {
        self.rt.block_on(self.inner.select(database))
    }

    pub fn close(self) -> Result<()> {
        let BlockingClient { inner, rt } = self;
        rt.block_on(inner.close())
    }
}

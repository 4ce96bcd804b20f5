use crate::config::ConnectionConfig;
use crate::{Error, Result};
use bytes::{Buf, Bytes, BytesMut};
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{lookup_host, TcpSocket, TcpStream};
use tokio::time;
use tracing::debug;

/// `Transport` moves raw bytes over one connection. It knows where lines end
/// and how long a payload is, nothing more.
///
/// `read_buf` is filled from the stream until the current read call can be
/// satisfied. Bytes past that point are kept for the next call.
#[derive(Debug)]
pub struct Transport<S = TcpStream> {
    // `None` once the transport has been closed.
    stream: Option<S>,
    read_buf: BytesMut,
}

const BUF_SIZE: usize = 4 * 1024;

/// Longest line accepted before its terminator shows up. Reply headers are
/// short; payloads are read with [`Transport::read`].
pub const MAX_LINE_LEN: usize = 64 * 1024;

impl Transport {
    /// Connect to the endpoint described by `config`.
    ///
    /// The whole attempt (name resolution included) is bounded by the
    /// configured timeout. Any failure is reported as [`Error::ConnectFailure`].
    pub async fn open(config: &ConnectionConfig) -> Result<Transport> {
        let res = within(config.options().timeout, connect(config)).await;

        let stream = res.map_err(|source| Error::ConnectFailure {
            target: config.target().to_string(),
            host: config.host().to_string(),
            port: config.port(),
            source,
        })?;

        debug!(addr = %config.addr(), "connected");

        Ok(Transport::new(stream))
    }
}

/// Run `attempt`, giving up with `TimedOut` once `limit` has passed.
async fn within<T>(
    limit: Option<Duration>,
    attempt: impl Future<Output = io::Result<T>>,
) -> io::Result<T> {
    match limit {
        Some(limit) => match time::timeout(limit, attempt).await {
            Ok(res) => res,
            Err(_) => Err(io::Error::new(io::ErrorKind::TimedOut, "connection timed out")),
        },
        None => attempt.await,
    }
}

/// Try every resolved address in turn, returning the first established stream.
async fn connect(config: &ConnectionConfig) -> io::Result<TcpStream> {
    let mut last_err = None;

    for addr in lookup_host(config.addr()).await? {
        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_keepalive(config.options().persistent)?;

        match socket.connect(addr).await {
            Ok(stream) => {
                stream.set_nodelay(true)?;
                return Ok(stream);
            }
            Err(err) => {
                debug!(%addr, cause = %err, "connect attempt failed");
                last_err = Some(err);
            }
        }
    }

    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "could not resolve to any address")
    }))
}

impl<S: AsyncRead + AsyncWrite + Unpin> Transport<S> {
    /// Wrap an already connected stream.
    pub fn new(stream: S) -> Transport<S> {
        Transport {
            stream: Some(stream),
            read_buf: BytesMut::with_capacity(BUF_SIZE),
        }
    }

    /// Send `bytes` in full.
    pub async fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or_else(closed)?;

        stream.write_all(bytes).await?;
        stream.flush().await?;

        Ok(())
    }

    /// Read up to and including the next `\r\n`. The terminator is part of the
    /// returned bytes.
    ///
    /// A line longer than [`MAX_LINE_LEN`] is a protocol failure.
    pub async fn read_line(&mut self) -> Result<Bytes> {
        // Bytes before `scanned` are known not to start a terminator.
        let mut scanned = 0;

        loop {
            if let Some(pos) = find_crlf(&self.read_buf[scanned..]) {
                return Ok(self.read_buf.split_to(scanned + pos + 2).freeze());
            }

            // The last byte may be a `\r` whose `\n` has not arrived yet.
            scanned = self.read_buf.len().saturating_sub(1);

            if scanned > MAX_LINE_LEN {
                return Err(Error::protocol(format!(
                    "reply line exceeds {} bytes without a terminator",
                    MAX_LINE_LEN
                )));
            }

            self.fill().await?;
        }
    }

    /// Read exactly `n` payload bytes and then the `\r\n` that must follow
    /// them. Only the payload is returned.
    pub async fn read(&mut self, n: usize) -> Result<Bytes> {
        let total = n
            .checked_add(2)
            .ok_or_else(|| Error::protocol(format!("payload length {} is too large", n)))?;

        // The length comes from the peer; `fill` grows the buffer as data arrives.
        if self.read_buf.len() < total {
            self.read_buf.reserve((total - self.read_buf.len()).min(BUF_SIZE));
        }

        while self.read_buf.len() < total {
            self.fill().await?;
        }

        let payload = self.read_buf.split_to(n).freeze();

        if &self.read_buf[..2] != b"\r\n" {
            return Err(Error::protocol(format!(
                "payload of {} bytes is not followed by a line terminator",
                n
            )));
        }
        self.read_buf.advance(2);

        Ok(payload)
    }

    /// Shut the stream down and release it. Calling it again does nothing.
    pub async fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            self.read_buf.clear();

            // The peer may already be gone; the handle is released either way.
            if let Err(err) = stream.shutdown().await {
                debug!(cause = %err, "shutdown after close");
            }
        }

        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// Pull more bytes from the stream into `read_buf`.
    async fn fill(&mut self) -> Result<()> {
        let stream = self.stream.as_mut().ok_or_else(closed)?;

        // `0` indicates "end of stream". Every caller is in the middle of a
        // reply at this point, so it is never a clean shutdown.
        if 0 == stream.read_buf(&mut self.read_buf).await? {
            let err = io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed by server");
            return Err(err.into());
        }

        Ok(())
    }
}

fn closed() -> Error {
    io::Error::new(io::ErrorKind::NotConnected, "transport is closed").into()
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

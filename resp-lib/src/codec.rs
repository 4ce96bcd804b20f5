//! RESP encoding of requests and decoding of replies.
//!
//! A request is always an array of bulk strings:
//!
//! ```text
//! *<number of tokens>\r\n
//! $<byte length>\r\n<token>\r\n
//! ...
//! ```
//!
//! A reply starts with one type byte per level: `+` status, `-` error,
//! `:` integer, `$` bulk string and `*` array. Bulk strings and arrays use a
//! length of `-1` for null.

use crate::cmd::Command;
use crate::transport::Transport;
use crate::{Error, Reply, Result};
use atoi::FromRadix10SignedChecked;
use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, warn};

/// Largest bulk string accepted, the same default as the server's
/// `proto-max-bulk-len` (512 MiB).
pub const MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// Encode `cmd` into a single request frame.
pub fn encode(cmd: &Command) -> Bytes {
    let tokens = cmd.tokens();

    // Each token adds `$`, up to 20 length digits and two terminators.
    let size = 24 + tokens.iter().map(|t| t.len() + 25).sum::<usize>();
    let mut buf = BytesMut::with_capacity(size);

    buf.put_u8(b'*');
    put_decimal(&mut buf, tokens.len());

    for token in tokens {
        // Lengths are byte lengths, not character counts.
        buf.put_u8(b'$');
        put_decimal(&mut buf, token.len());
        buf.put_slice(token);
        buf.put_slice(b"\r\n");
    }

    buf.freeze()
}

fn put_decimal(buf: &mut BytesMut, val: usize) {
    buf.put_slice(val.to_string().as_bytes());
    buf.put_slice(b"\r\n");
}

/// Send `cmd` and read its reply.
///
/// The frame goes out in a single write and exactly one reply is read back.
pub async fn exchange<S>(transport: &mut Transport<S>, cmd: &Command) -> Result<Reply>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    debug!(request = ?cmd);
    transport.write(&encode(cmd)).await?;

    let reply = read_reply(transport).await;
    match &reply {
        Ok(reply) => debug!(?reply),
        Err(Error::Server(msg)) => debug!(error = %msg, "server error reply"),
        Err(err) => warn!(cause = %err, "reply could not be read; connection is unusable"),
    }

    reply
}

/// What the first line of a reply announces.
enum Head {
    /// The line was the whole reply.
    Value(Reply),
    /// A bulk string payload of this many bytes follows.
    Bulk(usize),
    /// This many nested replies follow.
    Array(usize),
}

/// Read one complete reply, nested elements included.
///
/// An error reply at the top level is returned as [`Error::Server`]. Error
/// elements inside an array become [`Reply::Error`] so that the rest of the
/// array is still consumed.
pub async fn read_reply<S>(transport: &mut Transport<S>) -> Result<Reply>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    // Arrays still being filled, innermost last: (expected length, elements).
    let mut open: Vec<(usize, Vec<Reply>)> = Vec::new();

    'line: loop {
        let line = transport.read_line().await?;

        let mut reply = match parse_head(strip_terminator(&line))? {
            Head::Value(Reply::Error(msg)) if open.is_empty() => return Err(Error::Server(msg)),
            Head::Value(reply) => reply,
            Head::Bulk(len) => Reply::Bulk(Some(transport.read(len).await?)),
            Head::Array(0) => Reply::Array(Some(Vec::new())),
            Head::Array(len) => {
                // Do not trust the announced length for the allocation.
                open.push((len, Vec::with_capacity(len.min(1024))));
                continue;
            }
        };

        // Hand the finished reply to its parent, closing every array it completes.
        while let Some((len, mut items)) = open.pop() {
            items.push(reply);

            if items.len() < len {
                open.push((len, items));
                continue 'line;
            }

            reply = Reply::Array(Some(items));
        }

        return Ok(reply);
    }
}

fn parse_head(line: &[u8]) -> Result<Head> {
    let Some((&kind, rest)) = line.split_first() else {
        return Err(unhandled(line));
    };

    let head = match kind {
        b'+' => Head::Value(Reply::Status(String::from_utf8_lossy(rest).into_owned())),
        b'-' => Head::Value(Reply::Error(String::from_utf8_lossy(rest).into_owned())),
        b':' => Head::Value(Reply::Integer(parse_int(rest).ok_or_else(|| unhandled(line))?)),
        b'$' => match parse_int(rest) {
            Some(-1) => Head::Value(Reply::Bulk(None)),
            Some(len) => match usize::try_from(len) {
                Ok(len) if len <= MAX_BULK_LEN => Head::Bulk(len),
                _ => return Err(unhandled(line)),
            },
            None => return Err(unhandled(line)),
        },
        b'*' => match parse_int(rest) {
            Some(-1) => Head::Value(Reply::Array(None)),
            Some(len) => Head::Array(usize::try_from(len).map_err(|_| unhandled(line))?),
            None => return Err(unhandled(line)),
        },
        _ => return Err(unhandled(line)),
    };

    Ok(head)
}

/// Strict signed base-10 parse: the whole input must be consumed.
fn parse_int(src: &[u8]) -> Option<i64> {
    match i64::from_radix_10_signed_checked(src) {
        (Some(n), used) if used == src.len() && !src.is_empty() => Some(n),
        _ => None,
    }
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r\n").unwrap_or(line)
}

fn unhandled(line: &[u8]) -> Error {
    Error::protocol(format!(
        "Unable to handle server response [ {} ].",
        String::from_utf8_lossy(line)
    ))
}

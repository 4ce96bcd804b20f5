//! The value of a single server reply.

use bytes::Bytes;
use std::fmt;
use std::str;

/// A reply as read off the wire.
///
/// RESP has two distinct ways of saying "no value": a null bulk string and a
/// null array. They are kept apart here, and both differ from an empty array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Status(String),
    Integer(i64),
    /// `None` is the null bulk string (`$-1`).
    Bulk(Option<Bytes>),
    /// `None` is the null array (`*-1`); `Some(vec![])` is an empty array.
    Array(Option<Vec<Reply>>),
    /// An error element nested inside an array. A top level error reply is
    /// returned as [`Error::Server`](crate::Error::Server) instead.
    Error(String),
}

impl Reply {
    /// `true` for both null encodings.
    pub fn is_null(&self) -> bool {
        matches!(self, Reply::Bulk(None) | Reply::Array(None))
    }

    /// Raw bytes of a status or bulk reply.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Reply::Status(s) => Some(s.as_bytes()),
            Reply::Bulk(Some(data)) => Some(&data[..]),
            _ => None,
        }
    }

    /// A status reply, or a bulk reply holding valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Reply::Status(s) => Some(s),
            Reply::Bulk(Some(data)) => str::from_utf8(data).ok(),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Reply::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The elements of a non-null array.
    pub fn into_array(self) -> Option<Vec<Reply>> {
        match self {
            Reply::Array(items) => items,
            _ => None,
        }
    }

    /// Converts the reply to an "unexpected reply" error, for callers that
    /// expected a different reply shape.
    pub(crate) fn to_error(&self) -> crate::Error {
        match self {
            Reply::Error(msg) => crate::Error::Server(msg.clone()),
            other => crate::Error::protocol(format!("unexpected reply: {}", other)),
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        match self {
            Reply::Status(s) => f.write_str(s),
            Reply::Integer(n) => write!(f, "(integer) {}", n),
            Reply::Bulk(None) | Reply::Array(None) => f.write_str("(nil)"),
            Reply::Bulk(Some(data)) => match str::from_utf8(data) {
                Ok(s) => write!(f, "{:?}", s),
                Err(_) => write!(f, "{:?}", data),
            },
            Reply::Error(msg) => write!(f, "(error) {}", msg),
            Reply::Array(Some(items)) if items.is_empty() => f.write_str("(empty array)"),
            Reply::Array(Some(items)) => {
                // Number labels are right aligned to the widest index.
                let width = items.len().to_string().len();

                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, "\n{:indent$}", "", indent = indent)?;
                    }
                    write!(f, "{:>width$}) ", i + 1, width = width)?;
                    item.fmt_indented(f, indent + width + 2)?;
                }

                Ok(())
            }
        }
    }
}

/// Formats the reply the way `redis-cli` prints it.
impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl PartialEq<&str> for Reply {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == Some(other.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_encodings_stay_distinct() {
        let null_bulk = Reply::Bulk(None);
        let null_array = Reply::Array(None);
        let empty_array = Reply::Array(Some(vec![]));

        assert!(null_bulk.is_null());
        assert!(null_array.is_null());
        assert!(!empty_array.is_null());
        assert_ne!(null_bulk, null_array);
        assert_ne!(null_array, empty_array);
        assert_eq!(empty_array.into_array(), Some(vec![]));
        assert_eq!(null_array.into_array(), None);
    }

    #[test]
    fn accessors() {
        let bulk = Reply::Bulk(Some(Bytes::from_static(b"foobar")));
        assert_eq!(bulk.as_str(), Some("foobar"));
        assert_eq!(bulk, "foobar");

        let binary = Reply::Bulk(Some(Bytes::from_static(&[0xff, 0x00])));
        assert_eq!(binary.as_str(), None);
        assert_eq!(binary.as_bytes(), Some(&[0xff, 0x00][..]));

        assert_eq!(Reply::Status("OK".into()).as_str(), Some("OK"));
        assert_eq!(Reply::Integer(-3).as_integer(), Some(-3));
        assert_eq!(Reply::Integer(-3).as_str(), None);
    }

    #[test]
    fn display_like_redis_cli() {
        assert_eq!(Reply::Status("OK".into()).to_string(), "OK");
        assert_eq!(Reply::Integer(1).to_string(), "(integer) 1");
        assert_eq!(Reply::Bulk(None).to_string(), "(nil)");
        assert_eq!(Reply::Array(Some(vec![])).to_string(), "(empty array)");
        assert_eq!(
            Reply::Bulk(Some(Bytes::from_static(b"foo"))).to_string(),
            "\"foo\""
        );

        let nested = Reply::Array(Some(vec![
            Reply::Integer(3),
            Reply::Array(Some(vec![
                Reply::Bulk(Some(Bytes::from_static(b"a"))),
                Reply::Bulk(None),
            ])),
        ]));
        assert_eq!(
            nested.to_string(),
            "1) (integer) 3\n2) 1) \"a\"\n   2) (nil)"
        );
    }

    #[test]
    fn nested_error_converts_to_server_error() {
        let err = Reply::Error("WRONGTYPE".into()).to_error();
        assert!(matches!(err, crate::Error::Server(msg) if msg == "WRONGTYPE"));

        let err = Reply::Integer(1).to_error();
        assert!(matches!(err, crate::Error::ProtocolFailure(_)));
    }
}

use crate::cmd::{Command, Protocol};
use bytes::Bytes;
use std::time::Duration;

/// Set `key` to hold `value`.
///
/// If `key` already holds a value, it is overwritten, regardless of its type.
/// Any previous time to live associated with the key is discarded on successful
/// SET operation.
///
/// An expiration is sent with millisecond precision (`PX`).
#[derive(Debug)]
pub struct Set {
    key: String,
    value: Bytes,
    /// When to expire the key
    expire: Option<Duration>,
}

impl Set {
    pub fn new(key: impl ToString, value: Bytes, expire: Option<Duration>) -> Set {
        Set {
            key: key.to_string(),
            value,
            expire,
        }
    }
}

/// ```text
/// SET key value [PX milliseconds]
/// ```
impl Protocol for Set {
    fn into_command(self) -> Command {
        let cmd = Command::new("SET").arg(self.key).arg(self.value);

        match self.expire {
            Some(ttl) => cmd.arg("PX").arg(ttl.as_millis()),
            None => cmd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiration_is_sent_in_milliseconds() {
        let cmd = Set::new("k", Bytes::from_static(b"v"), Some(Duration::from_secs(2))).into_command();

        assert_eq!(cmd.tokens(), [&b"SET"[..], b"k", b"v", b"PX", b"2000"]);
    }
}

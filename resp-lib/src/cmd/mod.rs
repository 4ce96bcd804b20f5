//! Request side of the protocol: command token lists and the typed commands
//! built on top of them.

mod del;
pub use del::Del;

mod get;
pub use get::Get;

mod name;

mod ping;
pub use ping::Ping;

mod set;
pub use set::Set;

use bytes::Bytes;
use std::fmt;

/// An ordered list of tokens making up one request: the command, an optional
/// subcommand, then the arguments verbatim.
#[derive(Clone, PartialEq, Eq)]
pub struct Command {
    tokens: Vec<Bytes>,
}

/// Typed commands are turned into a [`Command`] before being sent.
pub trait Protocol {
    fn into_command(self) -> Command;
}

impl Command {
    /// A command whose first token is `name`, taken verbatim.
    pub fn new(name: impl Into<Arg>) -> Command {
        Command {
            tokens: vec![name.into().0],
        }
    }

    /// Build the tokens for a call such as `configRewrite` or `set`.
    ///
    /// The name is split into words at uppercase letters. The first word is
    /// the command, any remaining words are joined with `-` into the
    /// subcommand, and `args` follow in order.
    pub fn from_call(name: &str, args: &[Arg]) -> crate::Result<Command> {
        let mut tokens = name::resolve(name)?;
        tokens.extend(args.iter().map(|arg| arg.0.clone()));

        Ok(Command { tokens })
    }

    /// Append an argument.
    pub fn arg(mut self, arg: impl Into<Arg>) -> Command {
        self.push(arg);
        self
    }

    pub fn push(&mut self, arg: impl Into<Arg>) {
        self.tokens.push(arg.into().0);
    }

    pub fn tokens(&self) -> &[Bytes] {
        &self.tokens
    }

    fn is_auth(&self) -> bool {
        self.tokens
            .first()
            .is_some_and(|t| t.eq_ignore_ascii_case(b"AUTH"))
    }
}

impl Protocol for Command {
    fn into_command(self) -> Command {
        self
    }
}

// Prints tokens as text; `AUTH` arguments are never shown.
impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = self.is_auth();

        let mut list = f.debug_list();
        for (i, token) in self.tokens.iter().enumerate() {
            if redact && i > 0 {
                list.entry(&"<redacted>");
            } else {
                list.entry(&String::from_utf8_lossy(token));
            }
        }
        list.finish()
    }
}

/// One argument of a command, as the bytes that go on the wire.
///
/// Numbers are written in their canonical decimal form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arg(Bytes);

impl Arg {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Bytes> for Arg {
    fn from(src: Bytes) -> Arg {
        Arg(src)
    }
}

impl From<&Bytes> for Arg {
    fn from(src: &Bytes) -> Arg {
        Arg(src.clone())
    }
}

impl From<Vec<u8>> for Arg {
    fn from(src: Vec<u8>) -> Arg {
        Arg(Bytes::from(src))
    }
}

impl From<&[u8]> for Arg {
    fn from(src: &[u8]) -> Arg {
        Arg(Bytes::copy_from_slice(src))
    }
}

impl From<String> for Arg {
    fn from(src: String) -> Arg {
        Arg(Bytes::from(src))
    }
}

impl From<&String> for Arg {
    fn from(src: &String) -> Arg {
        Arg(Bytes::copy_from_slice(src.as_bytes()))
    }
}

impl From<&str> for Arg {
    fn from(src: &str) -> Arg {
        Arg(Bytes::copy_from_slice(src.as_bytes()))
    }
}

macro_rules! arg_from_display {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(src: $t) -> Arg {
                    Arg(Bytes::from(src.to_string()))
                }
            }
        )*
    };
}

arg_from_display!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_tokens_are_followed_by_arguments() {
        let cmd = Command::from_call("set", &["x".into(), 0.into()]).unwrap();

        assert_eq!(cmd.tokens(), [&b"SET"[..], b"x", b"0"]);
    }

    #[test]
    fn numbers_use_their_canonical_form() {
        assert_eq!(Arg::from(-42i64).as_bytes(), b"-42");
        assert_eq!(Arg::from(7u32).as_bytes(), b"7");
        assert_eq!(Arg::from(1.5f64).as_bytes(), b"1.5");
        assert_eq!(Arg::from(2.0f64).as_bytes(), b"2");
    }

    #[test]
    fn builder_appends_in_order() {
        let cmd = Command::new("SET").arg("k").arg(Bytes::from_static(b"v")).arg(10);

        assert_eq!(cmd.tokens(), [&b"SET"[..], b"k", b"v", b"10"]);
    }

    #[test]
    fn debug_redacts_auth_arguments() {
        let cmd = Command::from_call("auth", &["hunter2".into()]).unwrap();
        let debug = format!("{:?}", cmd);

        assert_eq!(debug, r#"["AUTH", "<redacted>"]"#);

        let cmd = Command::from_call("get", &["k".into()]).unwrap();
        assert_eq!(format!("{:?}", cmd), r#"["GET", "k"]"#);
    }
}

use crate::cmd::{Command, Protocol};
use bytes::Bytes;

/// Returns PONG if no argument is provided, otherwise a copy of the argument as a bulk.
///
/// This command is often used to test if a connection is still alive, or to measure latency.
#[derive(Debug, Default)]
pub struct Ping {
    echo: Option<Bytes>,
}

impl Ping {
    pub fn new(echo: Option<Bytes>) -> Ping {
        Ping { echo }
    }
}

/// ```text
/// PING [message]
/// ```
impl Protocol for Ping {
    fn into_command(self) -> Command {
        let cmd = Command::new("PING");

        match self.echo {
            Some(msg) => cmd.arg(msg),
            None => cmd,
        }
    }
}

use crate::cmd::{Command, Protocol};

/// Removes the specified keys. A key is ignored if it does not exist.
///
/// The server replies with the number of keys that were removed.
#[derive(Debug)]
pub struct Del {
    keys: Vec<String>,
}

impl Del {
    pub fn new(keys: Vec<String>) -> Del {
        Del { keys }
    }
}

/// ```text
/// DEL key [key ...]
/// ```
impl Protocol for Del {
    fn into_command(self) -> Command {
        self.keys.into_iter().fold(Command::new("DEL"), |cmd, key| cmd.arg(key))
    }
}

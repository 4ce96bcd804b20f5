use crate::cmd::{Command, Protocol};

/// Get the value of key.
///
/// If the key does not exist the special value nil is returned. An error is
/// returned if the value stored at key is not a string, because GET only
/// handles string values.
#[derive(Debug)]
pub struct Get {
    key: String,
}

impl Get {
    pub fn new(key: impl ToString) -> Get {
        Get {
            key: key.to_string(),
        }
    }
}

/// ```text
/// GET key
/// ```
impl Protocol for Get {
    fn into_command(self) -> Command {
        Command::new("GET").arg(self.key)
    }
}

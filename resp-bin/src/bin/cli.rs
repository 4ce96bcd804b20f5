#![warn(clippy::pedantic)]

use clap::Parser;
use resp_lib::{Arg, Client, ConnectionConfig, Error, DEFAULT_PORT};
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "resp-cli",
    version,
    author,
    about = "Issue a command to a Redis compatible server"
)]
struct CliCommand {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Sent with `AUTH` before the command.
    #[arg(long)]
    password: Option<String>,

    /// Database to `SELECT` before the command.
    #[arg(long, default_value_t = 0)]
    db: u32,

    /// Connection name, sent with `CLIENT SETNAME`.
    #[arg(long)]
    name: Option<String>,

    /// Connect timeout in seconds.
    #[arg(long, value_parser = duration_from)]
    timeout: Option<Duration>,

    /// Enable TCP keep-alive on the connection.
    #[arg(long)]
    persistent: bool,

    /// Call name, e.g. `get`, `configRewrite` or `clusterSetConfigEpoch`.
    command: String,

    /// Arguments, sent verbatim.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

impl CliCommand {
    fn config(&self) -> ConnectionConfig {
        let mut config = ConnectionConfig::new(&self.host, self.port)
            .with_database(self.db)
            .with_persistent(self.persistent);

        if let Some(password) = &self.password {
            config = config.with_password(password);
        }
        if let Some(name) = &self.name {
            config = config.with_name(name);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        config
    }
}

fn duration_from(src: &str) -> Result<Duration, String> {
    let secs = src.parse::<f64>().map_err(|e| e.to_string())?;
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}

/// `flavor = "current_thread"`: one connection, one command at a time.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error + Send + Sync>> {
    set_up_logging()?;

    let cmd = CliCommand::parse();
    let config = cmd.config();
    debug!(?config);

    let args: Vec<Arg> = cmd.args.iter().map(Arg::from).collect();

    let res = match Client::connect(config).await {
        Ok(mut client) => {
            let res = client.invoke(&cmd.command, &args).await;
            client.close().await?;
            res
        }
        Err(err) => Err(err),
    };

    match res {
        Ok(reply) => {
            println!("{}", reply);
            Ok(ExitCode::SUCCESS)
        }
        Err(Error::Server(msg)) => {
            println!("(error) {}", msg);
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            eprintln!("{}", err);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Logs go to stderr, filtered by `RUST_LOG`.
fn set_up_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_options_and_trailing_arguments() {
        let cmd = CliCommand::try_parse_from([
            "resp-cli", "--db", "2", "--name", "cli", "--timeout", "1.5", "set", "k", "-1",
        ])
        .unwrap();

        assert_eq!(cmd.command, "set");
        assert_eq!(cmd.args, ["k", "-1"]);

        let config = cmd.config();
        assert_eq!(config.addr(), "127.0.0.1:6379");
        assert_eq!(config.options().database, 2);
        assert_eq!(config.target(), "cli");
        assert_eq!(config.options().timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn rejects_a_negative_timeout() {
        assert!(duration_from("-1").is_err());
        assert!(duration_from("soon").is_err());
    }
}

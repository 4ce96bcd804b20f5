mod blocking_client;
pub use blocking_client::BlockingClient;

mod client;
pub use client::Client;

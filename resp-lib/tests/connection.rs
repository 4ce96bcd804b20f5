use resp_lib::{BlockingClient, Client, ConnectionConfig, Error, Reply};
use std::io::{self, Read, Write};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A local port nothing is listening on.
async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    port
}

#[tokio::test]
async fn failed_connection_names_the_host() {
    let config = ConnectionConfig::new("127.0.0.1", closed_port().await)
        .with_timeout(Duration::from_secs(2));

    let err = Client::connect(config).await.unwrap_err();

    assert!(matches!(err, Error::ConnectFailure { .. }));
    assert!(
        err.to_string().starts_with("Failed to connect to [ 127.0.0.1 ]."),
        "{}",
        err
    );
}

#[tokio::test]
async fn failed_connection_prefers_the_name() {
    let config = ConnectionConfig::new("127.0.0.1", closed_port().await)
        .with_name("test")
        .with_timeout(Duration::from_secs(2));

    let err = Client::connect(config).await.unwrap_err();

    assert!(err.to_string().starts_with("Failed to connect to [ test ]."), "{}", err);
    match err {
        Error::ConnectFailure { host, port, .. } => {
            assert_eq!(host, "127.0.0.1");
            assert_ne!(port, 0);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn unresolvable_host_is_a_connect_failure() {
    let config = ConnectionConfig::new("foobar.nope", 7777).with_timeout(Duration::from_secs(5));

    let err = Client::connect(config).await.unwrap_err();

    assert!(matches!(err, Error::ConnectFailure { .. }));
    assert!(err.to_string().starts_with("Failed to connect to [ foobar.nope ]."), "{}", err);
}

#[tokio::test]
async fn unresolvable_host_failure_uses_the_name() {
    let config = ConnectionConfig::new("foobar.nope", 7777)
        .with_name("test")
        .with_timeout(Duration::from_secs(5));

    let err = Client::connect(config).await.unwrap_err();

    assert!(err.to_string().starts_with("Failed to connect to [ test ]."), "{}", err);
}

#[tokio::test]
async fn connect_gives_up_after_the_timeout() {
    // Nothing answers on this address, so the attempt hangs until the limit.
    let config = ConnectionConfig::new("10.255.255.1", 6379).with_timeout(Duration::from_millis(200));

    match Client::connect(config).await.unwrap_err() {
        Error::ConnectFailure { target, source, .. } => {
            assert_eq!(target, "10.255.255.1");
            // Hosts without any route reject the attempt before the limit.
            assert!(
                matches!(
                    source.kind(),
                    io::ErrorKind::TimedOut
                        | io::ErrorKind::NetworkUnreachable
                        | io::ErrorKind::HostUnreachable
                ),
                "{:?}",
                source
            );
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn connect_runs_bootstrap_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let expected: &[&[u8]] = &[
            b"*2\r\n$4\r\nAUTH\r\n$6\r\nfoobar\r\n",
            b"*2\r\n$6\r\nSELECT\r\n$1\r\n3\r\n",
            b"*2\r\n$6\r\nCONFIG\r\n$7\r\nREWRITE\r\n",
        ];

        for request in expected {
            let mut buf = vec![0u8; request.len()];
            socket.read_exact(&mut buf).await.unwrap();
            assert_eq!(&buf[..], *request);
            socket.write_all(b"+OK\r\n").await.unwrap();
        }
    });

    let config = ConnectionConfig::new("127.0.0.1", port)
        .with_password("foobar")
        .with_database(3)
        .with_persistent(true);
    let mut client = Client::connect(config).await.unwrap();

    let reply = client.invoke("configRewrite", &[]).await.unwrap();
    assert_eq!(reply, Reply::Status("OK".into()));

    client.close().await.unwrap();
    server.await.unwrap();
}

#[test]
fn blocking_client_round_trip() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = std::thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();

        let request = b"*3\r\n$3\r\nSET\r\n$1\r\nx\r\n$1\r\n0\r\n";
        let mut buf = vec![0u8; request.len()];
        socket.read_exact(&mut buf).unwrap();
        assert_eq!(&buf[..], &request[..]);
        socket.write_all(b"+OK\r\n").unwrap();

        let request = b"*2\r\n$6\r\nLRANGE\r\n$1\r\nl\r\n";
        let mut buf = vec![0u8; request.len()];
        socket.read_exact(&mut buf).unwrap();
        assert_eq!(&buf[..], &request[..]);
        socket.write_all(b"*2\r\n:3\r\n$3\r\nbar\r\n").unwrap();
    });

    let mut client = BlockingClient::connect(ConnectionConfig::new("127.0.0.1", port)).unwrap();

    assert_eq!(
        client.invoke("set", &["x".into(), 0.into()]).unwrap(),
        Reply::Status("OK".into())
    );
    assert_eq!(
        client.invoke("lrange", &["l".into()]).unwrap(),
        Reply::Array(Some(vec![Reply::Integer(3), Reply::Bulk(Some("bar".into()))]))
    );

    client.close().unwrap();
    server.join().unwrap();
}

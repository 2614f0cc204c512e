use pretty_assertions::assert_eq;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use vsmtpd::resolver::{NoReverseDns, StaticResolver};
use vsmtpd::spool::ChannelSpool;
use vsmtpd::{CommandRegistry, ServeSummary, Server, ServerConfig, ServerContext};

struct TestServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<ServeSummary>,
}

impl TestServer {
    async fn start(context: ServerContext, max_connections: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server = Server::from_listener(listener, context, Arc::new(NoReverseDns), max_connections);
        let addr = server.local_addr().unwrap();

        let (shutdown, signal) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.run_until(async move {
            let _ = signal.await;
        }));

        Self {
            addr,
            shutdown,
            handle,
        }
    }

    async fn stop(self) -> ServeSummary {
        self.shutdown.send(()).unwrap();
        self.handle.await.unwrap()
    }
}

struct Client {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        }
    }

    async fn reply(&mut self) -> String {
        let mut reply = String::new();
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line).await.unwrap() == 0 {
                return reply;
            }
            let last = line.as_bytes().get(3) == Some(&b' ');
            reply.push_str(&line);
            if last {
                return reply;
            }
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\r\n", line).as_bytes())
            .await
            .unwrap();
    }

    async fn command(&mut self, line: &str) -> String {
        self.send(line).await;
        self.reply().await
    }
}

fn test_config() -> ServerConfig {
    ServerConfig {
        hostname: Some("mx.test".to_string()),
        size_limit: 4096,
        resolve_hostnames: false,
        ..ServerConfig::default()
    }
}

#[tokio::test]
async fn test_full_conversation() {
    let server = TestServer::start(ServerContext::from_config(&test_config()), 10).await;
    let mut client = Client::connect(server.addr).await;

    assert_eq!(client.reply().await, "220 mx.test ESMTP\r\n");
    assert_eq!(
        client.command("HELO client.test").await,
        "250 mx.test Hi  [127.0.0.1]; I am so happy to meet you.\r\n"
    );
    assert_eq!(
        client.command("MAIL FROM:<sender@test>").await,
        "250 FROM:<sender@test> sender OK - how exciting to get mail from you!\r\n"
    );
    assert_eq!(client.command("RCPT TO:<rcpt@test>").await, "550 Relaying denied\r\n");
    assert_eq!(client.command("DATA").await, "354 go ahead\r\n");
    client.send("Subject: hello").await;
    assert_eq!(
        client.command(".").await,
        "451 Queuing declined or disabled; try again later\r\n"
    );
    assert_eq!(client.command("RSET").await, "250 OK\r\n");
    assert_eq!(
        client.command("QUIT").await,
        "221 mx.test closing connection. Have a wonderful day.\r\n"
    );
    assert_eq!(client.reply().await, "");

    let summary = server.stop().await;
    assert_eq!(summary.sessions, 1);
    assert_eq!(summary.faulted, 0);
}

#[tokio::test]
async fn test_message_delivered_to_spool() {
    let config = test_config();
    let (spool, mut queued) = ChannelSpool::channel();
    let context = ServerContext::new(
        CommandRegistry::with_defaults(config.size_limit).seal(),
        &config,
        Arc::new(spool),
    );
    let server = TestServer::start(context, 10).await;
    let mut client = Client::connect(server.addr).await;

    client.reply().await;
    assert!(client.command("EHLO client.test").await.ends_with("250 SIZE 4096\r\n"));
    client.command("MAIL FROM:<sender@test>").await;
    client.command("DATA").await;
    client.send("Subject: hello").await;
    client.send("").await;
    client.send("..dotted").await;
    assert_eq!(client.command(".").await, "250 Queued\r\n");
    client.command("QUIT").await;

    let transaction = queued.recv().await.unwrap();
    assert_eq!(transaction.sender(), "FROM:<sender@test>");
    assert_eq!(transaction.body(), ["Subject: hello", "", ".dotted"]);

    server.stop().await;
}

#[tokio::test]
async fn test_oversized_message_refused() {
    let config = test_config();
    let (spool, mut queued) = ChannelSpool::channel();
    let context = ServerContext::new(
        CommandRegistry::with_defaults(config.size_limit).seal(),
        &config,
        Arc::new(spool),
    );
    let server = TestServer::start(context, 10).await;
    let mut client = Client::connect(server.addr).await;

    client.reply().await;
    client.command("HELO client.test").await;
    client.command("MAIL FROM:<sender@test>").await;
    client.command("DATA").await;
    let line = "x".repeat(500);
    for _ in 0..10 {
        client.send(&line).await;
    }
    assert_eq!(client.command(".").await, "552 Message too big!\r\n");
    assert_eq!(client.command("NOOP").await, "250 OK\r\n");
    client.command("QUIT").await;

    server.stop().await;
    assert!(queued.try_recv().is_err());
}

#[tokio::test]
async fn test_concurrent_sessions_are_independent() {
    let server = TestServer::start(ServerContext::from_config(&test_config()), 10).await;
    let mut first = Client::connect(server.addr).await;
    let mut second = Client::connect(server.addr).await;

    first.reply().await;
    second.reply().await;

    assert!(first.command("HELO one").await.starts_with("250 "));
    // The second session has not greeted yet.
    assert!(second.command("MAIL FROM:<a@test>").await.starts_with("503 "));
    assert!(second.command("HELO two").await.starts_with("250 "));

    first.command("QUIT").await;
    second.command("QUIT").await;

    let summary = server.stop().await;
    assert_eq!(summary.sessions, 2);
}

#[tokio::test]
async fn test_connection_limit() {
    let server = TestServer::start(ServerContext::from_config(&test_config()), 1).await;
    let mut first = Client::connect(server.addr).await;
    first.reply().await;

    let mut second = Client::connect(server.addr).await;
    assert_eq!(
        second.reply().await,
        "421 Too many connections, try again later\r\n"
    );

    first.command("QUIT").await;
    let summary = server.stop().await;
    assert_eq!(summary.refused, 1);
    assert_eq!(summary.sessions, 1);
}

#[tokio::test]
async fn test_shutdown_waits_for_active_sessions() {
    let server = TestServer::start(ServerContext::from_config(&test_config()), 10).await;
    let mut client = Client::connect(server.addr).await;
    client.reply().await;

    server.shutdown.send(()).unwrap();
    // Still served after the listener stops accepting.
    assert_eq!(client.command("NOOP").await, "250 OK\r\n");
    client.command("QUIT").await;

    let summary = server.handle.await.unwrap();
    assert_eq!(summary.sessions, 1);
}

#[tokio::test]
async fn test_peer_hostnames_from_resolver() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let resolver = StaticResolver::new([("127.0.0.1".parse().unwrap(), "localhost")]);
    let config = ServerConfig {
        hostname: None,
        ..test_config()
    };
    let server = Server::from_listener(
        listener,
        ServerContext::from_config(&config),
        Arc::new(resolver),
        10,
    );
    let addr = server.local_addr().unwrap();
    let (shutdown, signal) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.run_until(async move {
        let _ = signal.await;
    }));

    let mut client = Client::connect(addr).await;
    assert_eq!(client.reply().await, "220 localhost ESMTP\r\n");
    assert_eq!(
        client.command("HELO me").await,
        "250 localhost Hi localhost [127.0.0.1]; I am so happy to meet you.\r\n"
    );
    client.command("QUIT").await;

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}

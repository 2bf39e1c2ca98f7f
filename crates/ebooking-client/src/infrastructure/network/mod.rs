//! Network infrastructure for the client.
//!
//! Architecture:
//! - [`connect`] establishes the single TCP connection to the booking
//!   server, retrying on a fixed interval until it succeeds or the
//!   configured attempt budget runs out.
//! - [`Channel`] owns the connected stream for the rest of the session
//!   and exchanges whole [`Envelope`]s over the length-prefixed framing
//!   layer.  One channel, one user, strictly one request in flight.
//!
//! Directly after connecting, the server sends one greeting frame of
//! plain UTF-8 text.  [`Channel::read_greeting`] performs a single
//! blocking read for it, so a slow greeting is still consumed before the
//! first exchange; a peer that closes instead of greeting yields `None`.

use std::time::Duration;

use ebooking_core::{
    decode_envelope, encode_envelope, read_frame, write_frame, CodecError, Envelope, FramingError,
};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time;
use tracing::{debug, info, warn};

/// Errors that can occur in the client network layer.
#[derive(Debug, Error)]
pub enum ClientNetworkError {
    /// TCP connection could not be established within the attempt budget.
    #[error("failed to connect to server at {addr} after {attempts} attempt(s): {source}")]
    ConnectFailed {
        addr: String,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },
    /// An I/O error occurred on the established connection.
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A frame could not be read or written.
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),
    /// A received frame did not contain a decodable envelope.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Configuration for establishing the connection to the booking server.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// Server host name or IP address.
    pub host: String,
    /// Server TCP port.
    pub port: u16,
    /// Pause between connection attempts.
    pub retry_interval: Duration,
    /// Attempt budget.  `None` retries until the connection succeeds.
    pub max_attempts: Option<u32>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 2808,
            retry_interval: Duration::from_secs(2),
            max_attempts: None,
        }
    }
}

impl ConnectorConfig {
    /// The `host:port` string passed to the connector.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Connects to the booking server, retrying on `retry_interval` until a
/// connection is established or `max_attempts` is exhausted.
///
/// # Errors
///
/// Returns [`ClientNetworkError::ConnectFailed`] carrying the last
/// underlying error once the attempt budget runs out.  With
/// `max_attempts: None` this function only returns on success.
pub async fn connect(config: &ConnectorConfig) -> Result<Channel, ClientNetworkError> {
    let addr = config.addr();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        match TcpStream::connect(&addr).await {
            Ok(stream) => {
                info!(%addr, attempt, "connected to server");
                return Ok(Channel::new(stream));
            }
            Err(e) => {
                if let Some(max) = config.max_attempts {
                    if attempt >= max {
                        return Err(ClientNetworkError::ConnectFailed {
                            addr,
                            attempts: attempt,
                            source: e,
                        });
                    }
                }
                warn!(
                    %addr, attempt, error = %e,
                    "connection attempt failed; retrying in {:?}", config.retry_interval
                );
                time::sleep(config.retry_interval).await;
            }
        }
    }
}

/// An established connection exchanging envelopes over framed I/O.
///
/// Generic over the underlying stream so tests can run a channel over an
/// in-memory pipe; production code uses [`TcpStream`].
#[derive(Debug)]
pub struct Channel<S = TcpStream>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    stream: S,
    closed: bool,
}

impl<S> Channel<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wraps an already-connected stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            closed: false,
        }
    }

    /// Reads the server's greeting frame.
    ///
    /// Performs exactly one read and blocks until the frame arrives, so a
    /// slow greeting can never be left in the stream to be mistaken for
    /// the first response.  Returns `None` when the peer closes without
    /// sending one or when the frame is not valid UTF-8; a missing
    /// greeting is not an error.
    pub async fn read_greeting(&mut self) -> Option<String> {
        match read_frame(&mut self.stream).await {
            Ok(Some(payload)) => match String::from_utf8(payload) {
                Ok(text) => {
                    debug!(greeting = %text, "received server greeting");
                    Some(text)
                }
                Err(_) => {
                    warn!("greeting frame was not valid UTF-8; ignoring");
                    None
                }
            },
            Ok(None) => {
                warn!("connection closed before a greeting arrived");
                None
            }
            Err(e) => {
                warn!(error = %e, "failed to read greeting; continuing without one");
                None
            }
        }
    }

    /// Encodes `envelope` and writes it as one frame.
    pub async fn send_envelope(&mut self, envelope: &Envelope) -> Result<(), ClientNetworkError> {
        let payload = encode_envelope(envelope)?;
        write_frame(&mut self.stream, &payload).await?;
        Ok(())
    }

    /// Reads one frame and decodes it into an envelope.
    ///
    /// Returns `Ok(None)` when the peer closed the connection cleanly
    /// between frames.
    pub async fn receive_envelope(&mut self) -> Result<Option<Envelope>, ClientNetworkError> {
        match read_frame(&mut self.stream).await? {
            Some(payload) => Ok(Some(decode_envelope(&payload)?)),
            None => Ok(None),
        }
    }

    /// Shuts down the write side of the stream.  Idempotent; shutdown
    /// failures are logged and swallowed because the session is over
    /// either way.
    pub async fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.stream.shutdown().await {
            debug!(error = %e, "stream shutdown failed");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_config_default_matches_legacy_server() {
        // Arrange / Act
        let cfg = ConnectorConfig::default();

        // Assert
        assert_eq!(cfg.addr(), "127.0.0.1:2808");
        assert_eq!(cfg.retry_interval, Duration::from_secs(2));
        assert_eq!(cfg.max_attempts, None, "default is to retry forever");
    }

    #[tokio::test]
    async fn test_connect_succeeds_against_local_listener() {
        // Arrange
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let cfg = ConnectorConfig {
            port,
            max_attempts: Some(1),
            ..Default::default()
        };

        // Act
        let result = connect(&cfg).await;

        // Assert
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_connect_exhausts_attempt_budget() {
        // Arrange: bind then drop a listener to find a port nobody serves.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let cfg = ConnectorConfig {
            port,
            retry_interval: Duration::from_millis(10),
            max_attempts: Some(3),
            ..Default::default()
        };

        // Act
        let result = connect(&cfg).await;

        // Assert
        match result {
            Err(ClientNetworkError::ConnectFailed { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected ConnectFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connect_retries_until_listener_appears() {
        // Arrange: reserve a port, release it, start the listener shortly
        // after the first attempt has failed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        tokio::spawn(async move {
            time::sleep(Duration::from_millis(50)).await;
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await.unwrap();
            let _ = listener.accept().await;
        });

        let cfg = ConnectorConfig {
            port,
            retry_interval: Duration::from_millis(20),
            max_attempts: Some(20),
            ..Default::default()
        };

        // Act / Assert
        assert!(connect(&cfg).await.is_ok());
    }

    #[tokio::test]
    async fn test_channel_round_trips_an_envelope() {
        // Arrange
        let (a, b) = tokio::io::duplex(4096);
        let mut client = Channel::new(a);
        let mut server = Channel::new(b);

        // Act
        let request = Envelope::login("alice", "hunter2");
        client.send_envelope(&request).await.unwrap();
        let received = server.receive_envelope().await.unwrap();

        // Assert
        assert_eq!(received, Some(request));
    }

    #[tokio::test]
    async fn test_receive_returns_none_after_clean_close() {
        let (a, b) = tokio::io::duplex(64);
        let mut client = Channel::new(a);
        drop(b);

        assert_eq!(client.receive_envelope().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_greeting_returns_text_frame() {
        let (a, mut b) = tokio::io::duplex(256);
        let mut client = Channel::new(a);

        write_frame(&mut b, "Welcome to E-Booking".as_bytes()).await.unwrap();

        let greeting = client.read_greeting().await;
        assert_eq!(greeting.as_deref(), Some("Welcome to E-Booking"));
    }

    #[tokio::test]
    async fn test_read_greeting_waits_for_a_slow_server() {
        let (a, mut b) = tokio::io::duplex(256);
        let mut client = Channel::new(a);

        tokio::spawn(async move {
            time::sleep(Duration::from_millis(50)).await;
            write_frame(&mut b, "Welcome".as_bytes()).await.unwrap();
        });

        let greeting = client.read_greeting().await;
        assert_eq!(greeting.as_deref(), Some("Welcome"));
    }

    #[tokio::test]
    async fn test_read_greeting_handles_peer_close_quietly() {
        let (a, b) = tokio::io::duplex(64);
        let mut client = Channel::new(a);
        drop(b);

        // Peer closed without greeting; the channel reports its absence.
        assert_eq!(client.read_greeting().await, None);
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let (a, _b) = tokio::io::duplex(64);
        let mut client = Channel::new(a);

        client.shutdown().await;
        client.shutdown().await;
    }
}

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::dogstatsd::constants::DEFAULT_BUFFER_SIZE;
use crate::dogstatsd::errors::ListenerError;
use crate::dogstatsd::validator::{self, Reporter};

/// One UDP payload, as received. Never retained after it has been reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub payload: Bytes,
    pub source: SocketAddr,
    /// The datagram did not fit the receive buffer, `payload` only holds its
    /// first `buffer_size` bytes.
    pub truncated: bool,
}

#[derive(Debug, Clone)]
pub struct DogStatsDConfig {
    pub host: String,
    pub port: u16,
    pub buffer_size: usize,
}

impl Default for DogStatsDConfig {
    fn default() -> Self {
        DogStatsDConfig {
            host: crate::DOGSTATSD_HOST.to_string(),
            port: crate::DOGSTATSD_PORT,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

pub struct DogStatsD {
    socket: UdpSocket,
    buffer_size: usize,
    reporter: Arc<dyn Reporter>,
    cancel_token: CancellationToken,
}

impl std::fmt::Debug for DogStatsD {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DogStatsD")
            .field("socket", &self.socket)
            .field("buffer_size", &self.buffer_size)
            .finish_non_exhaustive()
    }
}

impl DogStatsD {
    /// Bind the listening socket.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Bind`] when the address is in use or cannot
    /// be bound. There is no fallback address.
    pub async fn new(
        config: &DogStatsDConfig,
        reporter: Arc<dyn Reporter>,
        cancel_token: CancellationToken,
    ) -> Result<DogStatsD, ListenerError> {
        let addr = format!("{}:{}", config.host, config.port);
        let socket = UdpSocket::bind(&addr)
            .await
            .map_err(|source| ListenerError::Bind { addr, source })?;
        debug!(
            "DOGSTATSD | Listening on {}",
            socket
                .local_addr()
                .map_or_else(|_| config.host.clone(), |a| a.to_string())
        );
        let buffer_size = if config.buffer_size == 0 {
            error!("DOGSTATSD | buffer_size must be positive, using {DEFAULT_BUFFER_SIZE}");
            DEFAULT_BUFFER_SIZE
        } else {
            config.buffer_size
        };

        Ok(DogStatsD {
            socket,
            buffer_size,
            reporter,
            cancel_token,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Wait for the next datagram. Malformed payloads are returned as is,
    /// only a failing socket is an error.
    ///
    /// One spare byte is read past `buffer_size` so a datagram the kernel had
    /// to cut can be told apart from one that fits exactly.
    pub async fn receive_next(&self) -> Result<Datagram, ListenerError> {
        let mut buf = BytesMut::zeroed(self.buffer_size + 1);
        let (amt, source) =
            self.socket
                .recv_from(&mut buf)
                .await
                .map_err(|source| ListenerError::Transport {
                    addr: self.socket.local_addr().ok(),
                    source,
                })?;
        let truncated = amt > self.buffer_size;
        buf.truncate(amt.min(self.buffer_size));
        Ok(Datagram {
            payload: buf.freeze(),
            source,
            truncated,
        })
    }

    /// Receive, validate and report datagrams one at a time until cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Transport`] if the socket fails, which ends
    /// the loop. Invalid payloads never end it.
    pub async fn spin(self) -> Result<(), ListenerError> {
        loop {
            tokio::select! {
                received = self.receive_next() => {
                    let datagram = received?;
                    let outcome = validator::validate_datagram(&datagram);
                    self.reporter.report(&datagram, &outcome);
                }
                () = self.cancel_token.cancelled() => {
                    debug!("DOGSTATSD | Received shutdown signal, closing socket");
                    return Ok(());
                }
            }
        }
    }
}

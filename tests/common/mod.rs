#![allow(dead_code)]

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dogstatsd_validator::dogstatsd::dogstatsd::{Datagram, DogStatsD, DogStatsDConfig};
use dogstatsd_validator::dogstatsd::errors::ListenerError;
use dogstatsd_validator::dogstatsd::validator::{Outcome, Reporter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const TIMEOUT: Duration = Duration::from_secs(5);

/// Forwards every report to the test.
pub struct ChannelReporter(pub mpsc::UnboundedSender<(Datagram, Outcome)>);

impl Reporter for ChannelReporter {
    fn report(&self, datagram: &Datagram, outcome: &Outcome) {
        let _ = self.0.send((datagram.clone(), *outcome));
    }
}

pub struct RunningListener {
    pub addr: SocketAddr,
    pub cancel_token: CancellationToken,
    pub handle: JoinHandle<Result<(), ListenerError>>,
}

/// Bind on an ephemeral loopback port so tests can run side by side.
pub fn ephemeral_config() -> DogStatsDConfig {
    DogStatsDConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..DogStatsDConfig::default()
    }
}

pub async fn start_listener(
    config: DogStatsDConfig,
    reporter: Arc<dyn Reporter>,
) -> RunningListener {
    let cancel_token = CancellationToken::new();
    let dogstatsd = DogStatsD::new(&config, reporter, cancel_token.clone())
        .await
        .expect("failed to bind dogstatsd");
    let addr = dogstatsd.local_addr().expect("bound socket has an address");
    let handle = tokio::spawn(dogstatsd.spin());
    RunningListener {
        addr,
        cancel_token,
        handle,
    }
}

pub async fn start_channel_listener(
    config: DogStatsDConfig,
) -> (RunningListener, mpsc::UnboundedReceiver<(Datagram, Outcome)>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let listener = start_listener(config, Arc::new(ChannelReporter(tx))).await;
    (listener, rx)
}

pub async fn next_report(rx: &mut mpsc::UnboundedReceiver<(Datagram, Outcome)>) -> (String, Outcome) {
    let (datagram, outcome) = tokio::time::timeout(TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for a datagram")
        .expect("reporter channel closed");
    (
        String::from_utf8_lossy(&datagram.payload).into_owned(),
        outcome,
    )
}

pub fn send_raw(addr: SocketAddr, payload: &[u8]) {
    let socket = std::net::UdpSocket::bind("127.0.0.1:0").expect("failed to bind client socket");
    socket.send_to(payload, addr).expect("failed to send datagram");
}

/// In-memory log sink for `tracing_subscriber`.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("lock poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Capture {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().expect("lock poisoned").clone()).expect("utf8 logs")
    }

    /// Poll until the captured logs contain `needle`.
    pub async fn wait_for(&self, needle: &str) -> String {
        let deadline = tokio::time::Instant::now() + TIMEOUT;
        loop {
            let logs = self.contents();
            if logs.contains(needle) {
                return logs;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "'{needle}' not found in log '{logs}'"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

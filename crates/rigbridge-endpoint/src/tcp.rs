use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{EndpointError, Result};

/// Read timeout applied to bridge sockets so relay cycles stay bounded
/// and shutdown is never stuck behind a blocking read.
pub const STREAM_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// How often the accept loop re-checks the shutdown flag while idle.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Single-client TCP listener for the base-unit side of the bridge.
pub struct BridgeListener {
    listener: TcpListener,
    local: SocketAddr,
}

impl BridgeListener {
    /// Bind and listen on the given port, all interfaces.
    pub fn bind(port: u16) -> Result<Self> {
        let addr = format!("0.0.0.0:{port}");
        let listener = TcpListener::bind(&addr).map_err(|source| EndpointError::Bind {
            addr: addr.clone(),
            source,
        })?;
        let local = listener.local_addr().map_err(EndpointError::Io)?;

        info!(%local, "listening for remote peer");
        Ok(Self { listener, local })
    }

    /// The bound local address (useful when binding port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local
    }

    /// Accept one incoming connection while honouring a shutdown flag.
    ///
    /// Polls a nonblocking accept so a cleared `running` flag is noticed
    /// within one poll interval even when no client ever shows up.
    /// Returns `Ok(None)` when shutdown was requested before a client
    /// connected.
    pub fn accept_interruptible(&self, running: &AtomicBool) -> Result<Option<TcpStream>> {
        self.listener.set_nonblocking(true).map_err(EndpointError::Io)?;
        let accepted = loop {
            if !running.load(Ordering::SeqCst) {
                break Ok(None);
            }
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    stream.set_nonblocking(false).map_err(EndpointError::Accept)?;
                    prepare_stream(&stream)?;
                    info!(%peer, "accepted remote peer");
                    break Ok(Some(stream));
                }
                Err(err) if err.kind() == ErrorKind::WouldBlock => {
                    std::thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => break Err(EndpointError::Accept(err)),
            }
        };
        let _ = self.listener.set_nonblocking(false);
        accepted
    }
}

/// Connect to the base unit (blocking) and prepare the stream for relay
/// use.
pub fn connect(addr: impl ToSocketAddrs + std::fmt::Display) -> Result<TcpStream> {
    let stream = TcpStream::connect(&addr).map_err(|source| EndpointError::Connect {
        addr: addr.to_string(),
        source,
    })?;
    prepare_stream(&stream)?;
    info!(%addr, "connected to remote peer");
    Ok(stream)
}

fn prepare_stream(stream: &TcpStream) -> Result<()> {
    stream.set_nodelay(true)?;
    stream.set_read_timeout(Some(STREAM_READ_TIMEOUT))?;
    debug!("stream prepared for relay");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::sync::Arc;
    use std::time::Instant;

    use super::*;

    #[test]
    fn accepted_stream_has_bounded_reads() {
        let listener = BridgeListener::bind(0).unwrap();
        let addr = listener.local_addr();
        let running = AtomicBool::new(true);

        let client = std::thread::spawn(move || connect(addr).unwrap());
        let accepted = listener.accept_interruptible(&running).unwrap().unwrap();
        let _client = client.join().unwrap();

        assert_eq!(
            accepted.read_timeout().unwrap(),
            Some(STREAM_READ_TIMEOUT)
        );
        assert!(accepted.nodelay().unwrap());
    }

    #[test]
    fn interruptible_accept_returns_none_once_shutdown_is_flagged() {
        let listener = BridgeListener::bind(0).unwrap();
        let running = Arc::new(AtomicBool::new(true));

        let stopper = {
            let running = Arc::clone(&running);
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(50));
                running.store(false, Ordering::SeqCst);
            })
        };

        let started = Instant::now();
        let accepted = listener.accept_interruptible(&running).unwrap();
        stopper.join().unwrap();

        assert!(accepted.is_none());
        // Shutdown must win well before any client would have connected.
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn interruptible_accept_hands_back_a_prepared_blocking_stream() {
        let listener = BridgeListener::bind(0).unwrap();
        let addr = listener.local_addr();
        let running = AtomicBool::new(true);

        let client = std::thread::spawn(move || {
            let mut stream = connect(addr).unwrap();
            stream.write_all(b"ping").unwrap();
            stream
        });

        let mut accepted = listener.accept_interruptible(&running).unwrap().unwrap();
        let mut buf = [0u8; 4];
        // read_exact only works if the accepted stream is back in
        // blocking mode despite the nonblocking accept loop.
        accepted.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ping");
        assert_eq!(accepted.read_timeout().unwrap(), Some(STREAM_READ_TIMEOUT));

        let _client = client.join().unwrap();
    }

    #[test]
    fn connect_refused_reports_addr() {
        // Bind then drop to get a port that refuses connections.
        let addr = {
            let listener = BridgeListener::bind(0).unwrap();
            listener.local_addr()
        };

        let err = connect(addr).unwrap_err();
        assert!(matches!(err, EndpointError::Connect { .. }));
    }
}

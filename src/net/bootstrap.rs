//! # Server Bootstrap
//!
//! Turns a port range into a bound listener. The probe in [`super::port`]
//! releases each port before reporting it, so another process can grab the
//! port between probe and real bind; when that happens the search restarts
//! from the next candidate. The retry is an explicit loop over a small state
//! machine, which bounds stack depth and keeps the policy inspectable.

use log::{error, info, warn};
use std::io::ErrorKind;
use thiserror::Error;
use tokio::net::TcpListener;

use super::port::{find_available_port, PortError};

#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Every port in the configured range is occupied. Fatal.
    #[error(transparent)]
    PortExhausted(#[from] PortError),

    /// A bind failure other than address-in-use (e.g. permission denied). Fatal.
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),
}

enum BootstrapState {
    Searching { floor: u16 },
    Binding { candidate: u16 },
}

/// Find a free port in `[start, max]` and bind a listener on it.
///
/// An `AddrInUse` failure on the real bind (probe/bind race) sends the state
/// machine back to `Searching` from the next port; the retry count is
/// unbounded within the range. Any other bind error is fatal.
///
/// # Returns
/// The bound listener and its port.
pub async fn bind_listener(start: u16, max: u16) -> Result<(TcpListener, u16), BootstrapError> {
    let mut state = BootstrapState::Searching { floor: start };

    loop {
        state = match state {
            BootstrapState::Searching { floor } => {
                let candidate = find_available_port(floor, max).await?;
                BootstrapState::Binding { candidate }
            }
            BootstrapState::Binding { candidate } => {
                match TcpListener::bind(("127.0.0.1", candidate)).await {
                    Ok(listener) => {
                        info!("🌐 Server started successfully on port {}", candidate);
                        return Ok((listener, candidate));
                    }
                    Err(e) if e.kind() == ErrorKind::AddrInUse => {
                        warn!(
                            "⚠️ Port {} is in use, trying the next port...",
                            candidate
                        );
                        if candidate >= max {
                            return Err(PortError::NoPortAvailable { start, max }.into());
                        }
                        BootstrapState::Searching {
                            floor: candidate + 1,
                        }
                    }
                    Err(e) => {
                        error!("❌ Failed to start the server: {}", e);
                        return Err(BootstrapError::Bind(e));
                    }
                }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binds_past_an_occupied_start_port() {
        let busy = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let taken = busy.local_addr().unwrap().port();

        let (listener, port) = bind_listener(taken, taken.saturating_add(50)).await.unwrap();
        assert_ne!(port, taken);
        assert_eq!(listener.local_addr().unwrap().port(), port);
    }

    #[tokio::test]
    async fn exhausted_range_is_fatal() {
        let busy = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let taken = busy.local_addr().unwrap().port();

        let err = bind_listener(taken, taken).await.unwrap_err();
        assert!(matches!(err, BootstrapError::PortExhausted(_)));
    }

    #[tokio::test]
    async fn listener_accepts_connections() {
        let busy = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let taken = busy.local_addr().unwrap().port();

        let (listener, port) = bind_listener(taken, taken.saturating_add(50)).await.unwrap();

        let connect = tokio::net::TcpStream::connect(("127.0.0.1", port));
        let (accepted, connected) = tokio::join!(listener.accept(), connect);
        accepted.unwrap();
        connected.unwrap();
    }
}

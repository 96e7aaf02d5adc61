//! # Port Probing
//!
//! Finds the first free TCP port in a range by briefly binding a listener on
//! each candidate. The probe listener is dropped before success is reported,
//! so the port is fully released for the caller's real bind. That bind can
//! still race with other processes; see [`super::bootstrap`] for the retry.

use thiserror::Error;
use tokio::net::TcpListener;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("no available port found in range {start}-{max}")]
    NoPortAvailable { start: u16, max: u16 },
}

/// Return the first port in `[start, max]` that accepts a transient
/// bind-and-listen probe on 127.0.0.1.
///
/// Probing is sequential (one probe completes before the next starts) and
/// stateless, so calling this repeatedly is safe.
///
/// # Errors
/// [`PortError::NoPortAvailable`] when every port in the range is occupied
/// (or the range is empty).
pub async fn find_available_port(start: u16, max: u16) -> Result<u16, PortError> {
    for port in start..=max {
        if is_port_available(port).await {
            return Ok(port);
        }
    }
    Err(PortError::NoPortAvailable { start, max })
}

async fn is_port_available(port: u16) -> bool {
    // Binding and immediately dropping releases the port before we report it.
    TcpListener::bind(("127.0.0.1", port)).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn skips_an_occupied_port() {
        let busy = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let taken = busy.local_addr().unwrap().port();

        let found = find_available_port(taken, taken.saturating_add(50))
            .await
            .unwrap();
        assert_ne!(found, taken);
        assert!(found > taken && found <= taken.saturating_add(50));
    }

    #[tokio::test]
    async fn reports_exhaustion_when_the_whole_range_is_taken() {
        let busy = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let taken = busy.local_addr().unwrap().port();

        let err = find_available_port(taken, taken).await.unwrap_err();
        assert!(matches!(
            err,
            PortError::NoPortAvailable { start, max } if start == taken && max == taken
        ));
    }

    #[tokio::test]
    async fn found_port_is_actually_bindable() {
        let busy = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let taken = busy.local_addr().unwrap().port();

        let found = find_available_port(taken, taken.saturating_add(50))
            .await
            .unwrap();
        TcpListener::bind(("127.0.0.1", found)).await.unwrap();
    }
}

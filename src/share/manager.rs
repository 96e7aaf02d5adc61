//! # Share Connection Manager
//!
//! Owns the lifecycle of the mounted network share. The mount state is
//! process-wide mutable state; every other component goes through
//! [`ShareConnectionManager::is_reachable`] or
//! [`ShareConnectionManager::ensure_connected`] instead of touching the
//! filesystem path directly.
//!
//! (Re)connection runs the external mount/unmount commands as async child
//! processes bounded by a timeout, so an unresponsive command cannot stall
//! request handling. A mutex serializes attempts: a `connect()` fully
//! completes before any dependent access queued behind it observes the
//! share's state.
//!
//! Connection failures are logged and reported to the caller, never fatal:
//! the share is best-effort and requests that need it get a connectivity
//! error at the time they need it.

use log::{debug, error, info};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::time::timeout;

use super::command::{mount_command, unmount_command, ShareCommand};
use crate::config::ShareConfig;

/// The periodic remount interval. The remount happens regardless of current
/// reachability to refresh session state that can silently expire.
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Bound on each external mount/unmount command; expiry kills the child and
/// counts as a connection failure.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareStatus {
    Unknown,
    Connected,
    Disconnected,
}

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not finish within {timeout_secs}s")]
    Timeout { program: String, timeout_secs: u64 },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

#[derive(Debug)]
struct ShareState {
    status: ShareStatus,
    last_attempt: Option<Instant>,
}

pub struct ShareConnectionManager {
    mount_path: PathBuf,
    unmount: ShareCommand,
    mount: ShareCommand,
    state: RwLock<ShareState>,
    // Serializes (re)connect attempts; see the module docs.
    connect_lock: Mutex<()>,
}

impl ShareConnectionManager {
    pub fn new(share: &ShareConfig) -> Self {
        Self::with_commands(
            share.mount_path.clone(),
            unmount_command(share),
            mount_command(share),
        )
    }

    fn with_commands(mount_path: PathBuf, unmount: ShareCommand, mount: ShareCommand) -> Self {
        Self {
            mount_path,
            unmount,
            mount,
            state: RwLock::new(ShareState {
                status: ShareStatus::Unknown,
                last_attempt: None,
            }),
            connect_lock: Mutex::new(()),
        }
    }

    /// Idempotently (re-)establish the mount: unmount first, ignoring any
    /// failure since "not currently mounted" is expected, then mount with
    /// the configured credentials.
    pub async fn connect(&self) -> Result<(), ShareError> {
        let _serialized = self.connect_lock.lock().await;

        if let Err(e) = run_command(&self.unmount, COMMAND_TIMEOUT).await {
            debug!("🔌 Unmount before remount failed (ignored): {}", e);
        }

        let result = run_command(&self.mount, COMMAND_TIMEOUT).await;

        let mut state = self.state.write().await;
        state.last_attempt = Some(Instant::now());
        match result {
            Ok(()) => {
                state.status = ShareStatus::Connected;
                info!("✅ Network share connection established");
                Ok(())
            }
            Err(e) => {
                state.status = ShareStatus::Disconnected;
                error!("❌ Failed to connect to the network share: {}", e);
                Err(e)
            }
        }
    }

    /// Cheap existence check against the mount path. Not a deep health check.
    pub async fn is_reachable(&self) -> bool {
        tokio::fs::try_exists(&self.mount_path)
            .await
            .unwrap_or(false)
    }

    /// Lazy reconnect-on-demand: if the mount path is reachable, done;
    /// otherwise exactly one [`connect`](Self::connect) whose result is
    /// propagated.
    pub async fn ensure_connected(&self) -> Result<(), ShareError> {
        if self.is_reachable().await {
            return Ok(());
        }
        self.connect().await
    }

    pub async fn status(&self) -> ShareStatus {
        self.state.read().await.status
    }

    pub async fn last_attempt(&self) -> Option<Instant> {
        self.state.read().await.last_attempt
    }

    /// Perform the initial mount, then remount unconditionally on every
    /// interval tick. Runs for the life of the process; failures are logged
    /// by `connect` and retried on the next tick.
    pub fn spawn_keepalive(self: &Arc<Self>, interval: Duration) {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            info!("🔌 Connecting to the network share...");
            let _ = manager.connect().await;
            loop {
                tokio::time::sleep(interval).await;
                debug!("🔄 Periodic share keep-alive remount");
                let _ = manager.connect().await;
            }
        });
    }
}

async fn run_command(command: &ShareCommand, limit: Duration) -> Result<(), ShareError> {
    let program = command.program().to_string();

    let child = command.build().spawn().map_err(|source| ShareError::Spawn {
        program: program.clone(),
        source,
    })?;

    // kill_on_drop is set on the command, so an expired wait kills the child.
    let output = match timeout(limit, child.wait_with_output()).await {
        Ok(result) => result.map_err(|source| ShareError::Spawn {
            program: program.clone(),
            source,
        })?,
        Err(_) => {
            return Err(ShareError::Timeout {
                program,
                timeout_secs: limit.as_secs(),
            })
        }
    };

    if output.status.success() {
        Ok(())
    } else {
        Err(ShareError::CommandFailed {
            program,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

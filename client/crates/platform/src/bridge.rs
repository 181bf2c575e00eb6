//! Desktop Companion Bridge
//!
//! After a login the client tells a cooperating desktop companion process
//! who is signed in, so the companion can act on the user's behalf.
//!
//! ## Contract
//! - `announce` returns immediately; delivery happens on a spawned task
//! - one attempt, no acknowledgement, no retry
//! - every failure is logged at `debug` and dropped
//! - an explicit logout also sends `SessionEnded`, on the same terms; a
//!   session lost to a failed refresh sends nothing
//!
//! Wire format: one JSON object per TCP connection, terminated by `\n`.

use std::net::SocketAddr;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::secret::SecretString;

/// Connect + write budget for a single announcement
const DELIVERY_BUDGET: Duration = Duration::from_secs(2);

/// Message sent to the companion
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompanionMessage {
    /// A user signed in (or registered) on this machine
    SessionStarted {
        user_id: String,
        name: String,
        email: Option<String>,
        role: String,
        organization: Option<String>,
        access_token: SecretString,
    },
    /// The session on this machine ended
    SessionEnded,
}

impl CompanionMessage {
    fn label(&self) -> &'static str {
        match self {
            CompanionMessage::SessionStarted { .. } => "session_started",
            CompanionMessage::SessionEnded => "session_ended",
        }
    }
}

/// Delivery failures (only ever logged)
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Companion did not accept the connection within {0:?}")]
    TimedOut(Duration),

    #[error("Companion I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not encode companion message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Best-effort signalling to the companion process
pub trait CompanionBridge: Send + Sync {
    /// Fire-and-forget announcement; never blocks, never fails
    fn announce(&self, message: CompanionMessage);
}

/// Bridge used when no companion is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBridge;

impl CompanionBridge for NoopBridge {
    fn announce(&self, message: CompanionMessage) {
        tracing::trace!(message = message.label(), "Companion bridge disabled");
    }
}

/// Local TCP bridge
#[derive(Debug, Clone)]
pub struct TcpCompanionBridge {
    addr: SocketAddr,
}

impl TcpCompanionBridge {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    async fn deliver(addr: SocketAddr, line: Vec<u8>) -> Result<(), BridgeError> {
        let mut stream = tokio::time::timeout(DELIVERY_BUDGET, TcpStream::connect(addr))
            .await
            .map_err(|_| BridgeError::TimedOut(DELIVERY_BUDGET))??;
        tokio::time::timeout(DELIVERY_BUDGET, async {
            stream.write_all(&line).await?;
            stream.shutdown().await
        })
        .await
        .map_err(|_| BridgeError::TimedOut(DELIVERY_BUDGET))??;
        Ok(())
    }
}

impl CompanionBridge for TcpCompanionBridge {
    fn announce(&self, message: CompanionMessage) {
        let label = message.label();
        let mut line = match serde_json::to_vec(&message) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(error = %BridgeError::from(e), "Companion message dropped");
                return;
            }
        };
        line.push(b'\n');

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(message = label, "No runtime available, companion message dropped");
            return;
        };

        let addr = self.addr;
        handle.spawn(async move {
            match Self::deliver(addr, line).await {
                Ok(()) => tracing::debug!(%addr, message = label, "Companion notified"),
                Err(e) => tracing::debug!(%addr, message = label, error = %e, "Companion unreachable"),
            }
        });
    }
}

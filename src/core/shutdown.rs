//! # OS signal handling and the shared shutdown deadline.
//!
//! [`wait_for_shutdown_signal`] completes when the process receives a
//! termination signal:
//! - **Unix**: `SIGINT` (Ctrl-C) or `SIGTERM` (default kill signal, used by
//!   systemd/Kubernetes).
//! - **Other platforms**: `Ctrl-C` via [`tokio::signal::ctrl_c`].
//!
//! [`Deadline`] is the single timeout shared by every stop path: component
//! `stop` calls and stop hooks all observe the same token, cancelled once
//! the configured duration elapses after shutdown begins. The deadline is
//! advisory — it never aborts a blocked stop, it only tells cooperative stop
//! logic that its time is up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners. Returns `Ok(())` when a
/// signal is received, or `Err` if listener registration fails.
#[cfg(unix)]
pub(crate) async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => {}
        _ = sigterm.recv() => {}
    }
    Ok(())
}

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners. Returns `Ok(())` when a
/// signal is received, or `Err` if listener registration fails.
#[cfg(not(unix))]
pub(crate) async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Shared shutdown-timeout primitive.
///
/// Cloned into every actor's interrupt path at load time. The first
/// [`Deadline::arm`] call starts the timer; every call returns the same
/// token, so all stop logic observes one deadline regardless of which
/// interrupt ran first.
#[derive(Clone)]
pub(crate) struct Deadline {
    grace: Duration,
    token: CancellationToken,
    armed: Arc<AtomicBool>,
}

impl Deadline {
    pub(crate) fn new(grace: Duration) -> Self {
        Self {
            grace,
            token: CancellationToken::new(),
            armed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts the timer if no caller has yet, and returns the shared token.
    ///
    /// Idempotent: later calls do not extend or reset the deadline.
    pub(crate) fn arm(&self) -> CancellationToken {
        if !self.armed.swap(true, Ordering::SeqCst) {
            let token = self.token.clone();
            let grace = self.grace;
            tokio::spawn(async move {
                tokio::time::sleep(grace).await;
                token.cancel();
            });
        }
        self.token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Instant};

    #[tokio::test]
    async fn armed_deadline_cancels_after_grace() {
        let deadline = Deadline::new(Duration::from_millis(50));
        let token = deadline.arm();
        assert!(!token.is_cancelled());

        let begin = Instant::now();
        token.cancelled().await;
        assert!(begin.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn unarmed_deadline_never_fires() {
        let deadline = Deadline::new(Duration::from_millis(10));
        let token = deadline.token.clone();
        assert!(timeout(Duration::from_millis(60), token.cancelled())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn arming_twice_does_not_extend_the_deadline() {
        let deadline = Deadline::new(Duration::from_millis(50));
        let begin = Instant::now();
        let token = deadline.arm();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let again = deadline.arm();
        again.cancelled().await;

        let elapsed = begin.elapsed();
        assert!(elapsed >= Duration::from_millis(50));
        assert!(
            elapsed < Duration::from_millis(200),
            "second arm reset the timer: {elapsed:?}"
        );
        assert!(token.is_cancelled());
    }
}

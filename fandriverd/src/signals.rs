//! Stop and reload requests
//!
//! The only state shared between signal delivery and the control loop is two
//! coalescing flags plus a wake-up for the loop's interruptible wait. Setting
//! a flag never blocks, logs, or touches I/O.

use fandriver_core::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Coalescing stop/reload flags with a wakeable timed wait
#[derive(Debug, Default)]
pub struct ControlSignals {
    stop: AtomicBool,
    reload: AtomicBool,
    wake: Notify,
}

impl ControlSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop. Repeated requests behave as one.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    /// Ask the loop to reload its configuration. Requests made before the
    /// loop consumes the flag behave as one.
    pub fn request_reload(&self) {
        self.reload.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Consume a pending reload request
    pub fn take_reload(&self) -> bool {
        self.reload.swap(false, Ordering::SeqCst)
    }

    /// Sleep for `timeout`, or less if a request is pending.
    ///
    /// A request made while nobody was waiting ends the next wait at once.
    /// Wake-ups left over from requests that were already consumed are
    /// ignored. The caller re-checks both flags afterwards either way.
    pub async fn wait(&self, timeout: Duration) {
        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => return,
                _ = self.wake.notified() => {
                    if self.stop_requested() || self.reload.load(Ordering::SeqCst) {
                        return;
                    }
                }
            }
        }
    }
}

/// Forward OS signals to `signals`
///
/// - SIGTERM, SIGINT: stop
/// - SIGHUP: reload
#[cfg(unix)]
pub fn spawn_listener(signals: Arc<ControlSignals>) -> Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut hangup = signal(SignalKind::hangup())?;

    Ok(tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(_) = terminate.recv() => signals.request_stop(),
                Some(_) = interrupt.recv() => signals.request_stop(),
                Some(_) = hangup.recv() => signals.request_reload(),
                else => break,
            }
        }
    }))
}

/// Forward Ctrl+C to `signals` as a stop request
#[cfg(not(unix))]
pub fn spawn_listener(signals: Arc<ControlSignals>) -> Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            signals.request_stop();
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_wait_times_out_without_requests() {
        let signals = ControlSignals::new();
        let start = Instant::now();

        signals.wait(Duration::from_millis(20)).await;

        assert!(start.elapsed() >= Duration::from_millis(20));
        assert!(!signals.stop_requested());
        assert!(!signals.take_reload());
    }

    #[tokio::test]
    async fn test_stop_wakes_waiter() {
        let signals = Arc::new(ControlSignals::new());
        let waiter = {
            let signals = signals.clone();
            tokio::spawn(async move { signals.wait(Duration::from_secs(3600)).await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        signals.request_stop();

        tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("wait was not interrupted")
            .unwrap();
        assert!(signals.stop_requested());
    }

    #[tokio::test]
    async fn test_request_before_wait_is_not_lost() {
        let signals = ControlSignals::new();
        signals.request_reload();

        tokio::time::timeout(Duration::from_secs(5), signals.wait(Duration::from_secs(3600)))
            .await
            .expect("pending request did not end the wait");
        assert!(signals.take_reload());
    }

    #[tokio::test]
    async fn test_coalesced_reloads_leave_no_wakeup_behind() {
        let signals = Arc::new(ControlSignals::new());
        let waiter = {
            let signals = signals.clone();
            tokio::spawn(async move { signals.wait(Duration::from_secs(3600)).await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        signals.request_reload();
        signals.request_reload();

        tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("wait was not interrupted")
            .unwrap();
        assert!(signals.take_reload());
        assert!(!signals.take_reload());

        // Nothing is pending, so the next wait runs to its timeout
        let start = Instant::now();
        signals.wait(Duration::from_millis(50)).await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_pending_stop_ends_every_wait() {
        let signals = ControlSignals::new();
        signals.request_stop();
        signals.wait(Duration::from_secs(3600)).await;

        tokio::time::timeout(Duration::from_secs(5), signals.wait(Duration::from_secs(3600)))
            .await
            .expect("stop did not end the second wait");
    }

    #[test]
    fn test_reload_requests_coalesce() {
        let signals = ControlSignals::new();
        signals.request_reload();
        signals.request_reload();

        assert!(signals.take_reload());
        assert!(!signals.take_reload());
    }

    #[test]
    fn test_stop_is_sticky() {
        let signals = ControlSignals::new();
        signals.request_stop();
        signals.request_stop();

        assert!(signals.stop_requested());
        assert!(signals.stop_requested());
    }
}

//! Suppressible interval driver

use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

/// A periodic callback that can be started and stopped any number of times
/// without leaking timers.
///
/// `start` while already running performs an implicit `stop`; `stop` while
/// not running is a no-op. Once `stop` returns, no further callback run is
/// started: the driving task re-checks its token after every tick wakeup, so
/// a tick that raced the cancellation is discarded instead of delivered.
/// Dropping the ticker stops it.
///
/// Each logical timer owns its own `Ticker`; there is no shared registry.
#[derive(Debug, Default)]
pub struct Ticker {
    cancel: Option<CancellationToken>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin invoking `callback` every `period`, starting one period from now.
    pub fn start<F>(&mut self, period: Duration, mut callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.stop();
        let token = CancellationToken::new();
        let ticking = token.clone();
        tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = ticking.cancelled() => break,
                    _ = interval.tick() => {
                        if ticking.is_cancelled() {
                            break;
                        }
                        callback();
                    }
                }
            }
        });
        self.cancel = Some(token);
    }

    /// Stop the driver. Idempotent.
    pub fn stop(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counter() -> (Arc<AtomicU32>, impl FnMut() + Send + 'static) {
        let count = Arc::new(AtomicU32::new(0));
        let inner = count.clone();
        (count, move || {
            inner.fetch_add(1, Ordering::Relaxed);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_at_period() {
        let (count, callback) = counter();
        let mut ticker = Ticker::new();
        ticker.start(Duration::from_millis(10), callback);

        tokio::time::sleep(Duration::from_millis(35)).await;
        assert_eq!(count.load(Ordering::Relaxed), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_callbacks() {
        let (count, callback) = counter();
        let mut ticker = Ticker::new();
        ticker.start(Duration::from_millis(10), callback);

        tokio::time::sleep(Duration::from_millis(25)).await;
        ticker.stop();
        assert!(!ticker.is_running());
        let at_stop = count.load(Ordering::Relaxed);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::Relaxed), at_stop);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_when_idle_is_noop() {
        let mut ticker = Ticker::new();
        ticker.stop();
        assert!(!ticker.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_previous_run() {
        let (first, first_cb) = counter();
        let (second, second_cb) = counter();
        let mut ticker = Ticker::new();

        ticker.start(Duration::from_millis(10), first_cb);
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert_eq!(first.load(Ordering::Relaxed), 2);

        // Implicit stop: the first callback must never fire again.
        ticker.start(Duration::from_millis(10), second_cb);
        tokio::time::sleep(Duration::from_millis(35)).await;
        assert_eq!(first.load(Ordering::Relaxed), 2);
        assert_eq!(second.load(Ordering::Relaxed), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_the_driver() {
        let (count, callback) = counter();
        {
            let mut ticker = Ticker::new();
            ticker.start(Duration::from_millis(10), callback);
            tokio::time::sleep(Duration::from_millis(15)).await;
        }
        let at_drop = count.load(Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::Relaxed), at_drop);
    }
}

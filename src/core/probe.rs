//! # Reachability probe with a bounded retry.
//!
//! One probe cycle issues at most [`MAX_ATTEMPTS`] GETs against the hub:
//!
//! ```text
//! attempt 1 ──► classify ──► Ok  ─────────────────────────► Reachable
//!                  │
//!                  └─ Err ─► ProbeAttemptFailed ─► sleep(retry_delay)
//!                                                     │
//! attempt 2 ──► classify ──► Ok  ─────────────────────────► Reachable
//!                  └─ Err ─► ProbeAttemptFailed ──────────► Unreachable
//! ```
//!
//! ## Classification
//! - status in `[0, 500)` → reachable (redirects and 401/403 included)
//! - status `>= 500`, missing status, transport error → failed attempt

use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use crate::error::{ProbeError, TransportError};
use crate::events::{Bus, Event, EventKind};
use crate::transport::TransportClient;

/// Upper bound on transport calls per probe cycle.
pub const MAX_ATTEMPTS: u32 = 2;

/// Result of one probe cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Probe cycle number assigned by the controller.
    pub cycle: u64,
    /// Whether the hub answered.
    pub reachable: bool,
    /// Transport calls used (1 or 2).
    pub attempts: u32,
}

/// Classifies one transport result.
pub fn classify(res: Result<Option<u16>, TransportError>) -> Result<u16, ProbeError> {
    match res {
        Ok(Some(code)) if code < 500 => Ok(code),
        Ok(Some(code)) => Err(ProbeError::Status { code }),
        Ok(None) => Err(ProbeError::MissingStatus),
        Err(e) => Err(ProbeError::Transport(e)),
    }
}

/// Probe bound to one hub URL.
///
/// Cheap to clone; each cycle runs on its own task.
#[derive(Clone)]
pub(crate) struct Probe {
    transport: Arc<dyn TransportClient>,
    url: Arc<str>,
    timeout: Duration,
    retry_delay: Duration,
    bus: Bus,
}

impl Probe {
    pub fn new(
        transport: Arc<dyn TransportClient>,
        url: impl Into<Arc<str>>,
        timeout: Duration,
        retry_delay: Duration,
        bus: Bus,
    ) -> Self {
        Self {
            transport,
            url: url.into(),
            timeout,
            retry_delay,
            bus,
        }
    }

    /// Runs one probe cycle.
    pub async fn run(&self, cycle: u64) -> ProbeOutcome {
        let mut attempt = 1;
        loop {
            match classify(self.attempt().await) {
                Ok(_) => {
                    return ProbeOutcome {
                        cycle,
                        reachable: true,
                        attempts: attempt,
                    };
                }
                Err(e) => {
                    self.bus.publish(
                        Event::new(EventKind::ProbeAttemptFailed)
                            .with_cycle(cycle)
                            .with_attempt(attempt)
                            .with_reason(e.to_string()),
                    );
                    if attempt >= MAX_ATTEMPTS {
                        return ProbeOutcome {
                            cycle,
                            reachable: false,
                            attempts: attempt,
                        };
                    }
                }
            }
            time::sleep(self.retry_delay).await;
            attempt += 1;
        }
    }

    /// One transport call, bounded by the timeout even if the transport ignores it.
    async fn attempt(&self) -> Result<Option<u16>, TransportError> {
        let timeout = self.timeout;
        match time::timeout(timeout, self.transport.get(&self.url, timeout)).await {
            Ok(res) => res,
            Err(_elapsed) => Err(TransportError::Timeout { timeout }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;

    struct Scripted {
        replies: Mutex<VecDeque<Result<Option<u16>, TransportError>>>,
        calls: AtomicU32,
    }

    impl Scripted {
        fn new(replies: Vec<Result<Option<u16>, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl TransportClient for Scripted {
        async fn get(&self, _url: &str, _timeout: Duration) -> Result<Option<u16>, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(Some(200)))
        }
    }

    struct Hanging;

    #[async_trait]
    impl TransportClient for Hanging {
        async fn get(&self, _url: &str, _timeout: Duration) -> Result<Option<u16>, TransportError> {
            std::future::pending().await
        }
    }

    fn refused() -> Result<Option<u16>, TransportError> {
        Err(TransportError::Connect {
            reason: "refused".into(),
        })
    }

    fn probe(transport: Arc<dyn TransportClient>) -> Probe {
        Probe::new(
            transport,
            "http://hub.local/",
            Duration::from_secs(5),
            Duration::from_millis(300),
            Bus::new(16),
        )
    }

    #[test]
    fn test_classify() {
        for code in [0u16, 200, 204, 302, 401, 403, 404, 499] {
            assert_eq!(classify(Ok(Some(code))), Ok(code), "status {code} should be reachable");
        }
        assert_eq!(classify(Ok(Some(500))), Err(ProbeError::Status { code: 500 }));
        assert_eq!(classify(Ok(Some(503))), Err(ProbeError::Status { code: 503 }));
        assert_eq!(classify(Ok(None)), Err(ProbeError::MissingStatus));
        assert!(matches!(classify(refused()), Err(ProbeError::Transport(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success() {
        let t = Scripted::new(vec![Ok(Some(401))]);
        let out = probe(t.clone()).run(1).await;
        assert!(out.reachable);
        assert_eq!(out.attempts, 1);
        assert_eq!(t.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_then_success() {
        let t = Scripted::new(vec![Ok(Some(502)), Ok(Some(200))]);
        let start = time::Instant::now();
        let out = probe(t.clone()).run(7).await;

        assert_eq!(
            out,
            ProbeOutcome {
                cycle: 7,
                reachable: true,
                attempts: 2
            }
        );
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_failures_is_unreachable_after_exactly_two_calls() {
        let t = Scripted::new(vec![refused(), refused(), Ok(Some(200))]);
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let p = Probe::new(
            t.clone(),
            "http://hub.local/",
            Duration::from_secs(5),
            Duration::from_millis(300),
            bus,
        );

        let out = p.run(1).await;
        assert!(!out.reachable);
        assert_eq!(out.attempts, 2);
        assert_eq!(t.calls.load(Ordering::SeqCst), 2);

        for expected in [1, 2] {
            let ev = rx.recv().await.unwrap();
            assert_eq!(ev.kind, EventKind::ProbeAttemptFailed);
            assert_eq!(ev.cycle, Some(1));
            assert_eq!(ev.attempt, Some(expected));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_transport_is_bounded_by_timeout() {
        let start = time::Instant::now();
        let out = probe(Arc::new(Hanging)).run(1).await;
        assert!(!out.reachable);
        assert_eq!(out.attempts, 2);
        assert_eq!(start.elapsed(), Duration::from_millis(10_300));
    }
}

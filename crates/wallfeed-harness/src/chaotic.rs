//! Chaotic transport wrapper for fault injection testing.
//!
//! Delegates to an inner transport but randomly fails requests, half of them
//! as refused connections and half as HTTP 503 replies. The RNG is a seeded
//! ChaCha stream shared by every clone, so a run is reproducible from its
//! seed as long as requests are issued in the same order.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wallfeed_client::{Reply, Transport, TransportError};

/// Transport wrapper that randomly injects failures.
#[derive(Clone)]
pub struct ChaoticTransport<T> {
    inner: T,
    /// Failure rate (0.0 = never fail, 1.0 = always fail)
    failure_rate: f64,
    rng: Arc<Mutex<ChaCha8Rng>>,
    requests: Arc<AtomicUsize>,
    injected: Arc<AtomicUsize>,
}

/// Fault chosen for one request.
enum Fault {
    Refused,
    Unavailable,
}

impl<T: Transport> ChaoticTransport<T> {
    /// Wrap `inner` with the given failure rate and RNG seed.
    ///
    /// Rates outside `[0.0, 1.0]` are clamped.
    pub fn with_seed(inner: T, failure_rate: f64, seed: u64) -> Self {
        Self {
            inner,
            failure_rate: failure_rate.clamp(0.0, 1.0),
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
            requests: Arc::new(AtomicUsize::new(0)),
            injected: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Underlying transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Requests attempted through this wrapper.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    /// Requests that were failed by injection.
    pub fn injected_count(&self) -> usize {
        self.injected.load(Ordering::Relaxed)
    }

    fn roll(&self) -> Option<Fault> {
        self.requests.fetch_add(1, Ordering::Relaxed);

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        if !rng.gen_bool(self.failure_rate) {
            return None;
        }

        self.injected.fetch_add(1, Ordering::Relaxed);
        Some(if rng.gen_bool(0.5) { Fault::Refused } else { Fault::Unavailable })
    }

    fn inject(fault: Fault, path: &str) -> Result<Reply, TransportError> {
        tracing::debug!(path, "injecting transport fault");
        match fault {
            Fault::Refused => Err(TransportError::Connection("chaos: connection refused".into())),
            Fault::Unavailable => Ok(Reply::new(503, "chaos: service unavailable")),
        }
    }
}

impl<T: Transport> Transport for ChaoticTransport<T> {
    async fn get(&self, path: &str, query: &[(&'static str, String)]) -> Result<Reply, TransportError> {
        match self.roll() {
            Some(fault) => Self::inject(fault, path),
            None => self.inner.get(path, query).await,
        }
    }

    async fn post_form(
        &self,
        path: &str,
        form: &[(&'static str, String)],
    ) -> Result<Reply, TransportError> {
        match self.roll() {
            Some(fault) => Self::inject(fault, path),
            None => self.inner.post_form(path, form).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use wallfeed_proto::endpoint;

    use super::*;
    use crate::SimServer;

    #[tokio::test]
    async fn zero_rate_never_fails() {
        let chaos = ChaoticTransport::with_seed(SimServer::with_messages(3), 0.0, 7);

        for _ in 0..20 {
            let reply = chaos.get(endpoint::PAGE_SIZE, &[]).await.unwrap();
            assert!(reply.is_success());
        }
        assert_eq!(chaos.request_count(), 20);
        assert_eq!(chaos.injected_count(), 0);
    }

    #[tokio::test]
    async fn full_rate_never_reaches_inner() {
        let server = SimServer::with_messages(3);
        let chaos = ChaoticTransport::with_seed(server.clone(), 1.0, 7);

        for _ in 0..20 {
            let failed = match chaos.get(endpoint::PAGE_SIZE, &[]).await {
                Ok(reply) => !reply.is_success(),
                Err(_) => true,
            };
            assert!(failed);
        }
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn same_seed_same_faults() {
        async fn pattern(seed: u64) -> Vec<bool> {
            let chaos = ChaoticTransport::with_seed(SimServer::new(), 0.5, seed);
            let mut out = Vec::new();
            for _ in 0..32 {
                out.push(chaos.get(endpoint::PAGE_SIZE, &[]).await.is_ok_and(|r| r.is_success()));
            }
            out
        }

        assert_eq!(pattern(42).await, pattern(42).await);
    }
}

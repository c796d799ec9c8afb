//! # Nonce Sequencing
//!
//! Single-writer assignment of the faucet account's transaction nonces.
//!
//! Every submission runs "read nonce, submit, increment" while holding one
//! async mutex, so two concurrent claims can never sign with the same
//! nonce. The next nonce is cached after a successful submission and
//! re-read from the node after a failed one, since a rejected transaction
//! may or may not have consumed its nonce.

use super::client::BlockchainResult;
use std::future::Future;
use tokio::sync::Mutex;

/// Serializes nonce assignment for one signing account.
#[derive(Debug, Default)]
pub struct NonceSequencer {
    next: Mutex<Option<u64>>,
}

impl NonceSequencer {
    /// Creates a sequencer that will read the first nonce from the node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `submit` with the next nonce.
    ///
    /// `fetch` is awaited only when no nonce is cached. The lock is held
    /// across `submit`, so submissions are strictly sequential.
    ///
    /// # Errors
    ///
    /// Propagates errors from `fetch` and `submit`. After a failed
    /// submission the cache is cleared.
    pub async fn submit_with_next<T, Fetch, Submit, SubmitFut>(
        &self,
        fetch: Fetch,
        submit: Submit,
    ) -> BlockchainResult<T>
    where
        Fetch: Future<Output = BlockchainResult<u64>>,
        Submit: FnOnce(u64) -> SubmitFut,
        SubmitFut: Future<Output = BlockchainResult<T>>,
    {
        let mut next = self.next.lock().await;
        let nonce = match *next {
            Some(cached) => cached,
            None => fetch.await?,
        };

        match submit(nonce).await {
            Ok(value) => {
                *next = nonce.checked_add(1);
                Ok(value)
            }
            Err(e) => {
                *next = None;
                Err(e)
            }
        }
    }

    /// Drops the cached nonce so the next submission re-reads it.
    ///
    /// Called when a submitted transaction is not mined, since its nonce
    /// may be reused.
    pub async fn reset(&self) {
        *self.next.lock().await = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::blockchain::client::BlockchainError;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn fetches_once_then_increments() {
        let sequencer = NonceSequencer::new();
        let fetches = AtomicU32::new(0);

        for expected in 7..10 {
            let used = sequencer
                .submit_with_next(
                    async {
                        fetches.fetch_add(1, Ordering::SeqCst);
                        Ok(7)
                    },
                    |nonce| async move { Ok(nonce) },
                )
                .await
                .unwrap();
            assert_eq!(used, expected);
        }

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_submission_forces_refetch() {
        let sequencer = NonceSequencer::new();

        let result: BlockchainResult<u64> = sequencer
            .submit_with_next(async { Ok(3) }, |_| async {
                Err(BlockchainError::transaction("nonce too low"))
            })
            .await;
        assert!(result.is_err());

        let used = sequencer
            .submit_with_next(async { Ok(5) }, |nonce| async move { Ok(nonce) })
            .await
            .unwrap();
        assert_eq!(used, 5);
    }

    #[tokio::test]
    async fn fetch_error_propagates() {
        let sequencer = NonceSequencer::new();
        let result: BlockchainResult<u64> = sequencer
            .submit_with_next(
                async { Err(BlockchainError::connection("down")) },
                |nonce| async move { Ok(nonce) },
            )
            .await;
        assert!(matches!(result, Err(BlockchainError::Connection(_))));
    }

    #[tokio::test]
    async fn reset_forces_refetch() {
        let sequencer = NonceSequencer::new();
        sequencer
            .submit_with_next(async { Ok(1) }, |nonce| async move { Ok(nonce) })
            .await
            .unwrap();
        sequencer.reset().await;

        let used = sequencer
            .submit_with_next(async { Ok(1) }, |nonce| async move { Ok(nonce) })
            .await
            .unwrap();
        assert_eq!(used, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_submissions_get_distinct_nonces() {
        let sequencer = Arc::new(NonceSequencer::new());
        let mut handles = Vec::new();

        for _ in 0..32 {
            let sequencer = Arc::clone(&sequencer);
            handles.push(tokio::spawn(async move {
                sequencer
                    .submit_with_next(async { Ok(100) }, |nonce| async move {
                        tokio::task::yield_now().await;
                        Ok(nonce)
                    })
                    .await
                    .unwrap()
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            assert!(seen.insert(handle.await.unwrap()));
        }
        let expected: HashSet<u64> = (100..132).collect();
        assert_eq!(seen, expected);
    }
}

//! Provider abstraction for fetching token snapshots from external APIs

use crate::{error::ProviderError, types::TokenSnapshot};
use async_trait::async_trait;

/// Trait for token snapshot providers
///
/// Implementations turn one request against a market-data source into a
/// complete `TokenSnapshot`, or a recoverable error.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Fetches the current snapshot for a token
    ///
    /// # Arguments
    /// * `token_address` - On-chain address of the token
    ///
    /// # Returns
    /// A snapshot with all four fields set, or an error if the fetch fails
    async fn fetch_snapshot(&self, token_address: &str) -> Result<TokenSnapshot, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Scripted response for the mock provider
    #[derive(Debug, Clone)]
    pub enum MockResponse {
        Snapshot(TokenSnapshot),
        PairNotFound,
        InvalidResponse(String),
    }

    /// Mock provider for testing
    ///
    /// Hands out scripted responses in order, then repeats the last one.
    pub struct MockProvider {
        responses: Arc<Mutex<VecDeque<MockResponse>>>,
        last: Arc<Mutex<Option<MockResponse>>>,
        delay: Duration,
        call_count: Arc<Mutex<usize>>,
    }

    impl Default for MockProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self {
                responses: Arc::new(Mutex::new(VecDeque::new())),
                last: Arc::new(Mutex::new(None)),
                delay: Duration::ZERO,
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        /// Makes every fetch take `delay` before answering
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn push_snapshot(&self, snapshot: TokenSnapshot) {
            self.push(MockResponse::Snapshot(snapshot));
        }

        pub fn push(&self, response: MockResponse) {
            self.responses.lock().unwrap().push_back(response);
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }

        fn next_response(&self) -> Option<MockResponse> {
            let mut last = self.last.lock().unwrap();
            if let Some(next) = self.responses.lock().unwrap().pop_front() {
                *last = Some(next);
            }
            last.clone()
        }
    }

    #[async_trait]
    impl SnapshotProvider for MockProvider {
        async fn fetch_snapshot(
            &self,
            token_address: &str,
        ) -> Result<TokenSnapshot, ProviderError> {
            *self.call_count.lock().unwrap() += 1;
            let response = self.next_response();

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            match response {
                Some(MockResponse::Snapshot(snapshot)) => Ok(snapshot),
                Some(MockResponse::PairNotFound) | None => {
                    Err(ProviderError::pair_not_found(token_address))
                }
                Some(MockResponse::InvalidResponse(msg)) => {
                    Err(ProviderError::InvalidResponse(msg))
                }
            }
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}

//! Injected dependencies shared by every feature reducer.

use crate::api::{ApiClient, HttpApiClient};
use crate::config::Config;
use crate::session::{FileTokenStore, TokenStore};
use concierge_core::environment::{Clock, SystemClock};
use std::sync::Arc;

/// Environment for the booking client's reducers.
///
/// All features share the same environment: one API client, one token
/// store, one clock. Effects clone the `Arc`s they need into their futures.
#[derive(Clone)]
pub struct ClientEnvironment {
    /// Remote API
    pub api: Arc<dyn ApiClient>,
    /// Persisted bearer token
    pub tokens: Arc<dyn TokenStore>,
    /// Time source
    pub clock: Arc<dyn Clock>,
    /// Client configuration
    pub config: Config,
}

impl ClientEnvironment {
    /// Production wiring: file-backed token store, reqwest API client,
    /// system clock.
    #[must_use]
    pub fn live(config: Config) -> Self {
        let tokens: Arc<dyn TokenStore> =
            Arc::new(FileTokenStore::new(config.token_path.clone()));
        let api: Arc<dyn ApiClient> = Arc::new(HttpApiClient::new(&config, tokens.clone()));
        Self {
            api,
            tokens,
            clock: Arc::new(SystemClock),
            config,
        }
    }
}

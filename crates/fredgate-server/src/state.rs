use std::sync::Arc;

use fredgate_core::FredClient;
use fredgate_keystore::KeyStore;

/// Shared request-handling collaborators, injected rather than global so
/// tests can substitute doubles for both the store and the upstream client.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyStore>,
    pub fred: Arc<FredClient>,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyStore>, fred: Arc<FredClient>) -> Self {
        Self { store, fred }
    }
}

#![allow(dead_code)]

use churnctl::auth::MemorySessionStore;
use churnctl::navigation::RecordingNavigator;
use churnctl::{ApiClient, Dashboard, Session};
use std::sync::Arc;
use wiremock::MockServer;

/// Client wired to a mock server, with handles on its session internals.
pub struct Harness {
    pub client: ApiClient,
    pub store: Arc<MemorySessionStore>,
    pub navigator: Arc<RecordingNavigator>,
}

impl Harness {
    pub fn new(server: &MockServer, token: Option<&str>) -> Self {
        let store = Arc::new(match token {
            Some(t) => MemorySessionStore::with_token(t),
            None => MemorySessionStore::new(),
        });
        let navigator = Arc::new(RecordingNavigator::new());
        let session = Session::new(store.clone(), navigator.clone());
        let client = ApiClient::new(server.uri(), session).unwrap();
        Self {
            client,
            store,
            navigator,
        }
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.client.clone())
    }
}

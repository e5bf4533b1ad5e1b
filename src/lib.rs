use std::sync::Arc;

use database::Store;
use fanout::FanOut;
use infrastructure::{IdentityVerifier, PushSender};

pub mod config;
pub mod database;
pub mod error;
pub mod fanout;
pub mod infrastructure;
pub mod middleware;
pub mod result;
pub mod utils;

pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub fanout: Arc<FanOut>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        verifier: Arc<dyn IdentityVerifier>,
        push: Arc<dyn PushSender>,
        fanout_concurrency: usize,
    ) -> Self {
        let fanout = Arc::new(FanOut::new(store.clone(), push, fanout_concurrency));
        Self {
            store,
            verifier,
            fanout,
        }
    }
}

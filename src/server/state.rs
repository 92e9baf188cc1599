use axum::extract::FromRef;

use crate::announce::AnnounceStore;
use crate::identity::IdentityResolver;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedAnnounceStore = Arc<AnnounceStore>;
pub type GuardedIdentityResolver = Arc<dyn IdentityResolver>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub announce_store: GuardedAnnounceStore,
    pub identity_resolver: GuardedIdentityResolver,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        announce_store: GuardedAnnounceStore,
        identity_resolver: GuardedIdentityResolver,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            announce_store,
            identity_resolver,
        }
    }
}

impl FromRef<ServerState> for GuardedAnnounceStore {
    fn from_ref(input: &ServerState) -> Self {
        input.announce_store.clone()
    }
}

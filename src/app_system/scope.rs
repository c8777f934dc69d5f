//! Store provider/consumer contract.
//!
//! A [`StoreScope`] binds one running store per entity type to a region of
//! the program. Consumers reach a store only through [`StoreScope::client`],
//! which fails fast when no enclosing scope provides that type — an
//! un-scoped store must never be observable.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::persistence::SnapshotStore;
use crate::store_framework::{StoreActor, StoreClient, StoreEntity};

#[derive(Debug, Error)]
pub enum ScopeError {
    /// Contract violation: the accessor was called outside any scope that
    /// provides this entity type. Not a recoverable runtime condition.
    #[error("{entity} store used outside a providing scope; wrap the caller in a scope that provides it")]
    MissingProvider { entity: &'static str },
    #[error("store task failed: {0}")]
    TaskFailed(String),
}

pub struct StoreScope {
    parent: Option<Arc<StoreScope>>,
    clients: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl StoreScope {
    pub fn root() -> Self {
        Self {
            parent: None,
            clients: HashMap::new(),
            handles: Vec::new(),
        }
    }

    /// A child scope. Lookups fall back to the parent chain, so a nested
    /// scope can shadow one entity type while inheriting the rest.
    #[allow(dead_code)]
    pub fn nested(parent: Arc<StoreScope>) -> Self {
        Self {
            parent: Some(parent),
            clients: HashMap::new(),
            handles: Vec::new(),
        }
    }

    /// Starts one store task for this scope's lifetime and registers its
    /// client. The store loads its collection from `snapshot` (or the
    /// entity's seed) before it starts serving.
    pub fn provide<T: StoreEntity>(
        &mut self,
        buffer_size: usize,
        snapshot: Box<dyn SnapshotStore>,
    ) -> StoreClient<T> {
        let (actor, client) = StoreActor::<T>::new(buffer_size, snapshot);
        self.handles.push(tokio::spawn(actor.run()));
        self.clients
            .insert(TypeId::of::<T>(), Box::new(client.clone()));
        info!(key = T::STORAGE_KEY, "Store provided");
        client
    }

    /// Consumer accessor. Resolves against this scope, then its ancestors;
    /// fails fast when nothing in scope provides `T`.
    pub fn client<T: StoreEntity>(&self) -> Result<StoreClient<T>, ScopeError> {
        if let Some(entry) = self.clients.get(&TypeId::of::<T>()) {
            if let Some(client) = entry.downcast_ref::<StoreClient<T>>() {
                return Ok(client.clone());
            }
        }
        match &self.parent {
            Some(parent) => parent.client::<T>(),
            None => Err(ScopeError::MissingProvider {
                entity: std::any::type_name::<T>(),
            }),
        }
    }

    /// Drops the registered clients (closing the store mailboxes) and waits
    /// for this scope's store tasks to finish. Ancestor scopes are left
    /// running.
    pub async fn shutdown(mut self) -> Result<(), ScopeError> {
        info!("Shutting down store scope");
        self.clients.clear();
        for handle in self.handles.drain(..) {
            handle
                .await
                .map_err(|e| ScopeError::TaskFailed(format!("{e:?}")))?;
        }
        info!("Store scope shutdown complete");
        Ok(())
    }
}

//! Generic entity store: an actor-backed, write-through collection of one
//! domain type.
//!
//! Each store owns an ordered `Vec` of entities and a boxed [`SnapshotStore`]
//! slot. Every accepted `add` re-serializes the full collection and saves it
//! before the response is sent, so the persisted blob and `list()` can never
//! disagree between two mutations. A failed save is logged and the in-memory
//! mutation still succeeds; durability degrades, the session does not.

use std::fmt::{Debug, Display};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, instrument, warn};

use crate::persistence::SnapshotStore;

/// Where a freshly added entity lands in the collection.
///
/// Orders prepend (most recent first), products append (oldest first). The
/// asymmetry is intentional and fixed per entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOrder {
    Prepend,
    Append,
}

/// Errors produced by the store itself.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("duplicate identifier: {0}")]
    DuplicateId(String),
    #[error("store channel closed")]
    ChannelClosed,
    #[error("store dropped the response")]
    ResponseDropped,
}

pub type StoreResponse<T> = oneshot::Sender<Result<T, StoreError>>;

/// Trait a domain entity implements to be managed by a [`StoreActor`].
pub trait StoreEntity:
    Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
    type Id: Eq + Clone + Send + Sync + Debug + Display + 'static;

    /// Caller-supplied creation payload, carrying the new identifier.
    type Draft: Send + Debug + 'static;

    /// Reserved persistence key for this entity type's snapshot.
    const STORAGE_KEY: &'static str;

    /// Insertion policy for new entities.
    const INSERT_ORDER: InsertOrder;

    fn id(&self) -> &Self::Id;

    /// Validation and normalization boundary. A rejected draft mutates
    /// nothing.
    fn from_draft(draft: Self::Draft) -> Result<Self, StoreError>;

    /// Collection used when no snapshot exists yet (or the stored blob is
    /// unreadable).
    fn seed() -> Vec<Self> {
        Vec::new()
    }
}

#[derive(Debug)]
pub enum StoreRequest<T: StoreEntity> {
    Add {
        draft: T::Draft,
        respond_to: StoreResponse<T::Id>,
    },
    List {
        respond_to: StoreResponse<Vec<T>>,
    },
    #[cfg(test)]
    Len {
        respond_to: StoreResponse<usize>,
    },
}

/// The store task. Holds the authoritative in-session collection and the
/// snapshot slot it writes through to.
pub struct StoreActor<T: StoreEntity> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    entries: Vec<T>,
    snapshot: Box<dyn SnapshotStore>,
}

impl<T: StoreEntity> StoreActor<T> {
    /// Creates the store and its client handle. The collection is loaded
    /// from the snapshot slot here, so the store is warm before `run` ever
    /// polls the mailbox.
    pub fn new(buffer_size: usize, snapshot: Box<dyn SnapshotStore>) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let entries = load_or_seed::<T>(snapshot.as_ref());
        let actor = Self {
            receiver,
            entries,
            snapshot,
        };
        let client = StoreClient::new(sender);
        (actor, client)
    }

    #[instrument(name = "entity_store", fields(key = T::STORAGE_KEY), skip(self))]
    pub async fn run(mut self) {
        info!(count = self.entries.len(), "Store starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Add { draft, respond_to } => {
                    self.handle_add(draft, respond_to);
                }
                StoreRequest::List { respond_to } => {
                    self.handle_list(respond_to);
                }
                #[cfg(test)]
                StoreRequest::Len { respond_to } => {
                    let _ = respond_to.send(Ok(self.entries.len()));
                }
            }
        }

        info!("Store stopped");
    }

    #[instrument(fields(key = T::STORAGE_KEY), skip(self, draft, respond_to))]
    fn handle_add(&mut self, draft: T::Draft, respond_to: StoreResponse<T::Id>) {
        debug!("Processing add request");

        let entity = match T::from_draft(draft) {
            Ok(entity) => entity,
            Err(e) => {
                error!(error = %e, "Draft rejected");
                let _ = respond_to.send(Err(e));
                return;
            }
        };

        let id = entity.id().clone();
        if self.entries.iter().any(|existing| existing.id() == &id) {
            error!(entity_id = %id, "Identifier already present");
            let _ = respond_to.send(Err(StoreError::DuplicateId(id.to_string())));
            return;
        }

        match T::INSERT_ORDER {
            InsertOrder::Prepend => self.entries.insert(0, entity),
            InsertOrder::Append => self.entries.push(entity),
        }
        self.persist();

        info!(entity_id = %id, count = self.entries.len(), "Entity added");
        let _ = respond_to.send(Ok(id));
    }

    #[instrument(fields(key = T::STORAGE_KEY), skip(self, respond_to))]
    fn handle_list(&self, respond_to: StoreResponse<Vec<T>>) {
        debug!(count = self.entries.len(), "Processing list request");
        let _ = respond_to.send(Ok(self.entries.clone()));
    }

    /// Write-through: serialize the full collection and overwrite the slot.
    /// Persistence failure is a warning, never an error for the caller.
    fn persist(&self) {
        let blob = match serde_json::to_string(&self.entries) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(key = T::STORAGE_KEY, error = %e, "Snapshot serialization failed, in-memory state kept");
                return;
            }
        };
        if let Err(e) = self.snapshot.save(T::STORAGE_KEY, &blob) {
            warn!(key = T::STORAGE_KEY, error = %e, "Snapshot write failed, in-memory state kept");
        }
    }
}

fn load_or_seed<T: StoreEntity>(snapshot: &dyn SnapshotStore) -> Vec<T> {
    match snapshot.load(T::STORAGE_KEY) {
        Some(blob) => match serde_json::from_str(&blob) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(key = T::STORAGE_KEY, error = %e, "Stored snapshot unparsable, starting from seed");
                T::seed()
            }
        },
        None => T::seed(),
    }
}

/// Cloneable handle to a store task.
#[derive(Clone, Debug)]
pub struct StoreClient<T: StoreEntity> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: StoreEntity> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    #[instrument(fields(key = T::STORAGE_KEY), skip(self, draft))]
    pub async fn add(&self, draft: T::Draft) -> Result<T::Id, StoreError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Add { draft, respond_to })
            .await
            .map_err(|_| StoreError::ChannelClosed)?;
        response.await.map_err(|_| StoreError::ResponseDropped)?
    }

    #[instrument(fields(key = T::STORAGE_KEY), skip(self))]
    pub async fn list(&self) -> Result<Vec<T>, StoreError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::List { respond_to })
            .await
            .map_err(|_| StoreError::ChannelClosed)?;
        response.await.map_err(|_| StoreError::ResponseDropped)?
    }

    /// Test-only internal-state inspection.
    #[cfg(test)]
    pub async fn len(&self) -> Result<usize, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Len { respond_to })
            .await
            .map_err(|_| StoreError::ChannelClosed)?;
        response.await.map_err(|_| StoreError::ResponseDropped)?
    }
}

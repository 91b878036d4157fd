//! Per-event unit of work.
//!
//! Reads go to the staged change set first and fall back to the store;
//! writes are staged until [`UnitOfWork::commit`]. Dropping a unit of work
//! without committing discards its writes.

use crate::error::StorageError;
use crate::store::{ChangeSet, Store};
use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::Hash;
use tributary_domain::{Candle, CandleKey, Pool, PoolId, ProtocolStats, Swap};

/// An entity the unit of work can load and stage.
#[async_trait]
pub trait Entity: Clone + Send + Sync + 'static {
    /// Identity of the entity within its collection.
    type Key: Clone + Eq + Hash + Send + Sync;

    /// Returns the entity's identity.
    fn entity_key(&self) -> Self::Key;

    /// Loads the entity from the backing store.
    async fn load(store: &dyn Store, key: &Self::Key) -> Result<Option<Self>, StorageError>;

    /// Staged records of this entity type.
    fn staged(changes: &ChangeSet) -> &HashMap<Self::Key, Self>;

    /// Mutable staged records of this entity type.
    fn staged_mut(changes: &mut ChangeSet) -> &mut HashMap<Self::Key, Self>;
}

#[async_trait]
impl Entity for Pool {
    type Key = PoolId;

    fn entity_key(&self) -> PoolId {
        self.id.clone()
    }

    async fn load(store: &dyn Store, key: &PoolId) -> Result<Option<Self>, StorageError> {
        store.load_pool(key).await
    }

    fn staged(changes: &ChangeSet) -> &HashMap<PoolId, Self> {
        &changes.pools
    }

    fn staged_mut(changes: &mut ChangeSet) -> &mut HashMap<PoolId, Self> {
        &mut changes.pools
    }
}

#[async_trait]
impl Entity for Swap {
    type Key = String;

    fn entity_key(&self) -> String {
        self.id.clone()
    }

    async fn load(store: &dyn Store, key: &String) -> Result<Option<Self>, StorageError> {
        store.load_swap(key).await
    }

    fn staged(changes: &ChangeSet) -> &HashMap<String, Self> {
        &changes.swaps
    }

    fn staged_mut(changes: &mut ChangeSet) -> &mut HashMap<String, Self> {
        &mut changes.swaps
    }
}

#[async_trait]
impl Entity for Candle {
    type Key = CandleKey;

    fn entity_key(&self) -> CandleKey {
        self.key()
    }

    async fn load(store: &dyn Store, key: &CandleKey) -> Result<Option<Self>, StorageError> {
        store.load_candle(key).await
    }

    fn staged(changes: &ChangeSet) -> &HashMap<CandleKey, Self> {
        &changes.candles
    }

    fn staged_mut(changes: &mut ChangeSet) -> &mut HashMap<CandleKey, Self> {
        &mut changes.candles
    }
}

#[async_trait]
impl Entity for ProtocolStats {
    type Key = String;

    fn entity_key(&self) -> String {
        self.id.clone()
    }

    async fn load(store: &dyn Store, key: &String) -> Result<Option<Self>, StorageError> {
        store.load_protocol_stats(key).await
    }

    fn staged(changes: &ChangeSet) -> &HashMap<String, Self> {
        &changes.protocol_stats
    }

    fn staged_mut(changes: &mut ChangeSet) -> &mut HashMap<String, Self> {
        &mut changes.protocol_stats
    }
}

/// Stages the writes of a single event against a store.
pub struct UnitOfWork<'a> {
    store: &'a dyn Store,
    changes: ChangeSet,
}

impl<'a> UnitOfWork<'a> {
    /// Starts an empty unit of work.
    #[must_use]
    pub fn new(store: &'a dyn Store) -> Self {
        Self {
            store,
            changes: ChangeSet::default(),
        }
    }

    /// Looks up an entity, preferring staged writes.
    ///
    /// # Errors
    /// Returns an error if the store lookup fails.
    pub async fn get<E: Entity>(&self, key: &E::Key) -> Result<Option<E>, StorageError> {
        if let Some(staged) = E::staged(&self.changes).get(key) {
            return Ok(Some(staged.clone()));
        }
        E::load(self.store, key).await
    }

    /// Stages an entity for writing.
    pub fn put<E: Entity>(&mut self, entity: E) {
        E::staged_mut(&mut self.changes).insert(entity.entity_key(), entity);
    }

    /// Returns the entity for `key`, staging `create()` if none exists yet.
    ///
    /// The boolean is `true` when the entity was created by this call.
    ///
    /// # Errors
    /// Returns an error if the store lookup fails.
    pub async fn get_or_create<E, F>(
        &mut self,
        key: &E::Key,
        create: F,
    ) -> Result<(E, bool), StorageError>
    where
        E: Entity,
        F: FnOnce() -> E + Send,
    {
        match self.get::<E>(key).await? {
            Some(existing) => Ok((existing, false)),
            None => {
                let created = create();
                self.put(created.clone());
                Ok((created, true))
            }
        }
    }

    /// Read-only view of the staged writes.
    #[must_use]
    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Writes every staged record in one atomic store commit.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    /// Returns the store's error; nothing is written in that case.
    pub async fn commit(self) -> Result<usize, StorageError> {
        let written = self.changes.len();
        if written > 0 {
            self.store.commit(self.changes).await?;
        }
        Ok(written)
    }
}

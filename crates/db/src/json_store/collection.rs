//! Id-keyed row collection used by the document backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use trialsite_core::types::DbId;

use crate::models::company::Company;
use crate::models::hospital::Hospital;
use crate::models::news::News;
use crate::models::pdf::Pdf;
use crate::models::protocol::StudyProtocol;
use crate::models::training::TrainingMaterial;

/// Rows keyed by id plus the next id to hand out.
///
/// Ids are never reused, even after a hard delete, matching a Postgres
/// `BIGSERIAL` column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection<T> {
    next_id: DbId,
    rows: BTreeMap<DbId, T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Clone> Collection<T> {
    /// Allocate an id, build the row with it, store it and return a copy.
    pub fn insert(&mut self, build: impl FnOnce(DbId) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    pub fn get(&self, id: DbId) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: DbId) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    pub fn remove(&mut self, id: DbId) -> Option<T> {
        self.rows.remove(&id)
    }

    /// Rows in id order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.rows.values_mut()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rows that are soft-deleted by stamping `deleted_at`.
pub trait Tombstone {
    fn is_deleted(&self) -> bool;
}

macro_rules! impl_tombstone {
    ($($ty:ty),* $(,)?) => {
        $(impl Tombstone for $ty {
            fn is_deleted(&self) -> bool {
                self.deleted_at.is_some()
            }
        })*
    };
}

impl_tombstone!(Company, Hospital, News, Pdf, StudyProtocol, TrainingMaterial);

impl<T: Clone + Tombstone> Collection<T> {
    /// A row that exists and is not soft-deleted.
    pub fn live(&self, id: DbId) -> Option<&T> {
        self.get(id).filter(|row| !row.is_deleted())
    }

    pub fn live_mut(&mut self, id: DbId) -> Option<&mut T> {
        self.get_mut(id).filter(|row| !row.is_deleted())
    }

    pub fn live_values(&self) -> impl Iterator<Item = &T> {
        self.values().filter(|row| !row.is_deleted())
    }
}

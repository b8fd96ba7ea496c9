//! Typed access to one stored record collection.

use std::collections::HashSet;
use std::marker::PhantomData;

use serde_json::Value;
use thiserror::Error;

use crate::backup::record_id;
use crate::models::Record;
use crate::store::{KeyValueStore, StoreError, StoreKey};

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Stored value for {0} is not an array")]
    NotAnArray(StoreKey),
    #[error("Record {id} in {key} could not be decoded: {source}")]
    Decode {
        key: StoreKey,
        id: String,
        source: serde_json::Error,
    },
    #[error("Failed to encode record for {key}: {source}")]
    Encode {
        key: StoreKey,
        source: serde_json::Error,
    },
}

/// A record collection stored as one JSON array under `R::KEY`.
///
/// Every write rewrites the whole array. Writes work on the raw stored
/// elements, so elements that do not decode as `R` are kept as they are.
pub struct Collection<'a, S: ?Sized, R> {
    store: &'a mut S,
    _record: PhantomData<R>,
}

impl<'a, S, R> Collection<'a, S, R>
where
    S: KeyValueStore + ?Sized,
    R: Record,
{
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    fn load_raw(&self) -> Result<Vec<Value>, CollectionError> {
        match self.store.get_json(R::KEY)? {
            None => Ok(Vec::new()),
            Some(Value::Array(records)) => Ok(records),
            Some(_) => Err(CollectionError::NotAnArray(R::KEY)),
        }
    }

    fn save_raw(&mut self, records: Vec<Value>) -> Result<(), CollectionError> {
        self.store.set_json(R::KEY, &Value::Array(records))?;
        Ok(())
    }

    fn encode(record: &R) -> Result<Value, CollectionError> {
        serde_json::to_value(record).map_err(|source| CollectionError::Encode {
            key: R::KEY,
            source,
        })
    }

    /// All records that decode as `R`, in stored order.
    pub fn list(&self) -> Result<Vec<R>, CollectionError> {
        Ok(self.list_with_skipped()?.0)
    }

    /// Like [`list`](Self::list), also returning the ids of the elements
    /// that did not decode (`"(no id)"` for elements without one).
    pub fn list_with_skipped(&self) -> Result<(Vec<R>, Vec<String>), CollectionError> {
        let mut records = Vec::new();
        let mut skipped = Vec::new();
        for raw in self.load_raw()? {
            let id = record_id(&raw).unwrap_or("(no id)").to_string();
            match serde_json::from_value::<R>(raw) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Skipping undecodable record {} in {}: {}", id, R::KEY, e);
                    skipped.push(id);
                }
            }
        }
        Ok((records, skipped))
    }

    pub fn get(&self, id: &str) -> Result<Option<R>, CollectionError> {
        let Some(raw) = self
            .load_raw()?
            .into_iter()
            .find(|raw| record_id(raw) == Some(id))
        else {
            return Ok(None);
        };

        serde_json::from_value(raw)
            .map(Some)
            .map_err(|source| CollectionError::Decode {
                key: R::KEY,
                id: id.to_string(),
                source,
            })
    }

    /// Replaces the record with the same id in place, or appends it.
    ///
    /// Returns true if an existing record was replaced.
    pub fn upsert(&mut self, record: &R) -> Result<bool, CollectionError> {
        let encoded = Self::encode(record)?;
        let mut records = self.load_raw()?;

        let replaced = match records
            .iter()
            .position(|raw| record_id(raw) == Some(record.id()))
        {
            Some(pos) => {
                records[pos] = encoded;
                true
            }
            None => {
                records.push(encoded);
                false
            }
        };

        self.save_raw(records)?;
        tracing::debug!("Saved {} in {}", record.id(), R::KEY);
        Ok(replaced)
    }

    /// Applies `f` to the record with `id` and writes it back.
    ///
    /// Returns false without writing if no record has that id, which is how
    /// a late update to a deleted record is discarded.
    pub fn update<F>(&mut self, id: &str, f: F) -> Result<bool, CollectionError>
    where
        F: FnOnce(&mut R),
    {
        let mut records = self.load_raw()?;
        let Some(pos) = records.iter().position(|raw| record_id(raw) == Some(id)) else {
            tracing::debug!("No record {} in {}; update discarded", id, R::KEY);
            return Ok(false);
        };

        let mut record: R =
            serde_json::from_value(records[pos].clone()).map_err(|source| {
                CollectionError::Decode {
                    key: R::KEY,
                    id: id.to_string(),
                    source,
                }
            })?;
        f(&mut record);
        records[pos] = Self::encode(&record)?;

        self.save_raw(records)?;
        Ok(true)
    }

    /// Removes every record whose id is in `ids`. Returns how many were removed.
    ///
    /// Nothing is written when no id matches.
    pub fn delete_many<I>(&mut self, ids: I) -> Result<usize, CollectionError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let ids: HashSet<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        let mut records = self.load_raw()?;
        let before = records.len();

        records.retain(|raw| !record_id(raw).is_some_and(|id| ids.contains(id)));
        let removed = before - records.len();

        if removed > 0 {
            self.save_raw(records)?;
            tracing::debug!("Deleted {} record(s) from {}", removed, R::KEY);
        }
        Ok(removed)
    }

    /// Removes the record with `id`. Returns true if it existed.
    pub fn delete(&mut self, id: &str) -> Result<bool, CollectionError> {
        Ok(self.delete_many([id])? > 0)
    }
}

use bfly_types::{Butterfly, Collection, IdGenerator, Rating, Record, RecordId, User};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// The full persisted state: one array per collection.
///
/// A top-level key missing from the file loads as an empty collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub butterflies: Vec<Butterfly>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub ratings: Vec<Rating>,
}

impl StoreDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, collection: Collection) -> usize {
        match collection {
            Collection::Butterflies => self.butterflies.len(),
            Collection::Users => self.users.len(),
            Collection::Ratings => self.ratings.len(),
        }
    }

    /// Total records across all collections.
    pub fn total(&self) -> usize {
        Collection::ALL.iter().map(|c| self.len(*c)).sum()
    }

    pub fn contains(&self, collection: Collection, id: &str) -> bool {
        match collection {
            Collection::Butterflies => self.butterflies.iter().any(|b| b.id == id),
            Collection::Users => self.users.iter().any(|u| u.id == id),
            Collection::Ratings => self.ratings.iter().any(|r| r.id == id),
        }
    }

    /// First record with `id`, in store order.
    pub fn find(&self, collection: Collection, id: &str) -> Option<Record> {
        match collection {
            Collection::Butterflies => self
                .butterflies
                .iter()
                .find(|b| b.id == id)
                .cloned()
                .map(Record::from),
            Collection::Users => self.users.iter().find(|u| u.id == id).cloned().map(Record::from),
            Collection::Ratings => self
                .ratings
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .map(Record::from),
        }
    }

    /// Every record in `collection` matching `predicate`, in store order.
    pub fn filter(&self, collection: Collection, predicate: &dyn Fn(&Record) -> bool) -> Vec<Record> {
        let records: Box<dyn Iterator<Item = Record> + '_> = match collection {
            Collection::Butterflies => Box::new(self.butterflies.iter().cloned().map(Record::from)),
            Collection::Users => Box::new(self.users.iter().cloned().map(Record::from)),
            Collection::Ratings => Box::new(self.ratings.iter().cloned().map(Record::from)),
        };
        records.filter(|r| predicate(r)).collect()
    }

    /// Append a record to the end of its collection.
    ///
    /// Fails with [`StoreError::DuplicateId`] if the id is already taken.
    pub fn push(&mut self, record: Record) -> StoreResult<()> {
        let collection = record.collection();
        if self.contains(collection, record.id().as_str()) {
            return Err(StoreError::DuplicateId {
                collection,
                id: record.id().clone(),
            });
        }
        match record {
            Record::Butterfly(b) => self.butterflies.push(b),
            Record::User(u) => self.users.push(u),
            Record::Rating(r) => self.ratings.push(r),
        }
        Ok(())
    }

    /// Give every record that has no id a fresh one from `ids`.
    ///
    /// Generated ids are unique within their collection. Returns how many
    /// records were updated.
    pub fn assign_missing_ids(&mut self, ids: &dyn IdGenerator) -> usize {
        let mut assigned = 0;
        for collection in Collection::ALL {
            let missing = match collection {
                Collection::Butterflies => {
                    positions_without_id(self.butterflies.iter().map(|b| &b.id))
                }
                Collection::Users => positions_without_id(self.users.iter().map(|u| &u.id)),
                Collection::Ratings => positions_without_id(self.ratings.iter().map(|r| &r.id)),
            };
            for pos in missing {
                let mut id = ids.generate();
                while id.is_empty() || self.contains(collection, id.as_str()) {
                    id = ids.generate();
                }
                match collection {
                    Collection::Butterflies => self.butterflies[pos].id = id,
                    Collection::Users => self.users[pos].id = id,
                    Collection::Ratings => self.ratings[pos].id = id,
                }
                assigned += 1;
            }
        }
        assigned
    }

    /// Remove the last record of `collection`, returning its id.
    pub(crate) fn pop(&mut self, collection: Collection) -> Option<RecordId> {
        match collection {
            Collection::Butterflies => self.butterflies.pop().map(|b| b.id),
            Collection::Users => self.users.pop().map(|u| u.id),
            Collection::Ratings => self.ratings.pop().map(|r| r.id),
        }
    }
}

fn positions_without_id<'a>(ids: impl Iterator<Item = &'a RecordId>) -> Vec<usize> {
    ids.enumerate()
        .filter(|(_, id)| id.is_empty())
        .map(|(pos, _)| pos)
        .collect()
}

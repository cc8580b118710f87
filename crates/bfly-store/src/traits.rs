use bfly_types::{Butterfly, Collection, Rating, Record, User};

use crate::document::StoreDocument;
use crate::error::StoreResult;

/// Durable collection-of-collections holding every record.
///
/// All implementations must satisfy these invariants:
/// - `find_by_id` and `filter` scan in store (insertion) order.
/// - `append` never overwrites: an id already present in the target
///   collection is rejected.
/// - `append` returns only once the record is as durable as the backend
///   gets; concurrent appends are serialized and none is lost.
pub trait RecordStore: Send + Sync {
    /// First record in `collection` whose id equals `id`.
    fn find_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Record>>;

    /// Every record in `collection` for which `predicate` holds, in store order.
    fn filter(
        &self,
        collection: Collection,
        predicate: &dyn Fn(&Record) -> bool,
    ) -> StoreResult<Vec<Record>>;

    /// Add a record to the collection it belongs to and persist.
    ///
    /// Returns the stored record.
    fn append(&self, record: Record) -> StoreResult<Record>;

    /// Number of records in `collection`.
    fn count(&self, collection: Collection) -> StoreResult<usize>;

    /// A copy of the full current state.
    fn snapshot(&self) -> StoreResult<StoreDocument>;

    fn butterfly(&self, id: &str) -> StoreResult<Option<Butterfly>> {
        Ok(self
            .find_by_id(Collection::Butterflies, id)?
            .and_then(|r| r.as_butterfly().cloned()))
    }

    fn user(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self
            .find_by_id(Collection::Users, id)?
            .and_then(|r| r.as_user().cloned()))
    }

    /// Ratings left by `user_id`, ascending by score.
    ///
    /// The sort is stable: equal scores keep store order.
    fn ratings_for_user(&self, user_id: &str) -> StoreResult<Vec<Rating>> {
        let mut ratings: Vec<Rating> = self
            .filter(Collection::Ratings, &|r| {
                r.as_rating().is_some_and(|r| r.user_id == user_id)
            })?
            .into_iter()
            .filter_map(|r| match r {
                Record::Rating(r) => Some(r),
                _ => None,
            })
            .collect();
        ratings.sort_by(Rating::cmp_score);
        Ok(ratings)
    }
}

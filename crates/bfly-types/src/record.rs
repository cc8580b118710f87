use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::collection::Collection;
use crate::id::RecordId;

/// Properties a stored record carries beyond its known fields.
///
/// Kept so that rewriting the store file never drops data another writer
/// put there. Records created through the API always start with none.
pub type ExtraFields = Map<String, Value>;

/// A butterfly species entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Butterfly {
    #[serde(default)]
    pub id: RecordId,
    pub common_name: String,
    pub species: String,
    /// Link to a reference article about the species.
    pub article: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: RecordId,
    pub username: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// A user's score for a butterfly.
///
/// `butterfly_id` and `user_id` are free-form: they are not checked against
/// existing butterflies or users.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    #[serde(default)]
    pub id: RecordId,
    pub butterfly_id: String,
    pub user_id: String,
    /// Kept as a JSON number so integer scores are echoed back as integers.
    pub rating: Number,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Rating {
    /// The score as a float, for ordering.
    pub fn score(&self) -> f64 {
        self.rating.as_f64().unwrap_or(f64::NAN)
    }

    /// Ascending order by score.
    pub fn cmp_score(&self, other: &Self) -> Ordering {
        self.score().total_cmp(&other.score())
    }
}

/// Request payload for a new butterfly, before an id is assigned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewButterfly {
    pub common_name: String,
    pub species: String,
    pub article: String,
}

impl NewButterfly {
    pub fn into_record(self, id: RecordId) -> Butterfly {
        Butterfly {
            id,
            common_name: self.common_name,
            species: self.species,
            article: self.article,
            extra: Default::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
    pub username: String,
}

impl NewUser {
    pub fn into_record(self, id: RecordId) -> User {
        User {
            id,
            username: self.username,
            extra: Default::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewRating {
    pub butterfly_id: String,
    pub user_id: String,
    pub rating: Number,
}

impl NewRating {
    pub fn into_record(self, id: RecordId) -> Rating {
        Rating {
            id,
            butterfly_id: self.butterfly_id,
            user_id: self.user_id,
            rating: self.rating,
            extra: Default::default(),
        }
    }
}

/// Any stored record.
///
/// Serializes as the bare record object, with no variant tag.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Butterfly(Butterfly),
    User(User),
    Rating(Rating),
}

impl Record {
    pub fn collection(&self) -> Collection {
        match self {
            Self::Butterfly(_) => Collection::Butterflies,
            Self::User(_) => Collection::Users,
            Self::Rating(_) => Collection::Ratings,
        }
    }

    pub fn id(&self) -> &RecordId {
        match self {
            Self::Butterfly(b) => &b.id,
            Self::User(u) => &u.id,
            Self::Rating(r) => &r.id,
        }
    }

    pub fn as_butterfly(&self) -> Option<&Butterfly> {
        match self {
            Self::Butterfly(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_user(&self) -> Option<&User> {
        match self {
            Self::User(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_rating(&self) -> Option<&Rating> {
        match self {
            Self::Rating(r) => Some(r),
            _ => None,
        }
    }
}

impl From<Butterfly> for Record {
    fn from(b: Butterfly) -> Self {
        Self::Butterfly(b)
    }
}

impl From<User> for Record {
    fn from(u: User) -> Self {
        Self::User(u)
    }
}

impl From<Rating> for Record {
    fn from(r: Rating) -> Self {
        Self::Rating(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rating(id: &str, score: Number) -> Rating {
        Rating {
            id: RecordId::new(id),
            butterfly_id: "monarch".into(),
            user_id: "u".into(),
            rating: score,
            extra: Default::default(),
        }
    }

    #[test]
    fn butterfly_uses_camel_case_wire_names() {
        let b = Butterfly {
            id: RecordId::new("wxyz9876"),
            common_name: "test-butterfly".into(),
            species: "Testium butterflius".into(),
            article: "https://example.com/testium_butterflius".into(),
            extra: Default::default(),
        };
        assert_eq!(
            serde_json::to_value(&b).unwrap(),
            json!({
                "id": "wxyz9876",
                "commonName": "test-butterfly",
                "species": "Testium butterflius",
                "article": "https://example.com/testium_butterflius"
            })
        );
    }

    #[test]
    fn integer_rating_stays_integer() {
        let draft: NewRating = serde_json::from_value(json!({
            "butterflyId": "b",
            "userId": "u",
            "rating": 3
        }))
        .unwrap();
        let r = draft.into_record(RecordId::new("r1"));
        assert_eq!(serde_json::to_string(&r.rating).unwrap(), "3");
    }

    #[test]
    fn stored_records_keep_unknown_fields() {
        let stored = json!({
            "id": "wxyz9876",
            "commonName": "test-butterfly",
            "species": "Testium butterflius",
            "article": "https://example.com/testium_butterflius",
            "notes": "keep me"
        });
        let b: Butterfly = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(b.extra.get("notes"), Some(&json!("keep me")));
        assert_eq!(serde_json::to_value(&b).unwrap(), stored);
    }

    #[test]
    fn stored_rating_without_id_loads_with_empty_id() {
        let r: Rating = serde_json::from_value(json!({
            "butterflyId": "GI9_EuH8s1",
            "userId": "OOWzUaHLsK",
            "rating": 3
        }))
        .unwrap();
        assert!(r.id.is_empty());
        assert!(r.extra.is_empty());
    }

    #[test]
    fn drafts_reject_unknown_fields() {
        let result: Result<NewUser, _> =
            serde_json::from_value(json!({ "username": "a", "extra": "field" }));
        assert!(result.is_err());
    }

    #[test]
    fn score_ordering_mixes_ints_and_floats() {
        let low = rating("a", Number::from(1));
        let high = rating("b", Number::from_f64(4.5).unwrap());
        assert_eq!(low.cmp_score(&high), Ordering::Less);
        assert_eq!(high.cmp_score(&low), Ordering::Greater);
    }

    #[test]
    fn record_serializes_untagged() {
        let rec = Record::from(User {
            id: RecordId::new("abcd1234"),
            username: "test-user".into(),
            extra: Default::default(),
        });
        assert_eq!(rec.collection(), Collection::Users);
        assert_eq!(rec.id(), &RecordId::new("abcd1234"));
        assert_eq!(
            serde_json::to_value(&rec).unwrap(),
            json!({ "id": "abcd1234", "username": "test-user" })
        );
    }
}

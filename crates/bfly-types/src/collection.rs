use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The three record collections held by the store.
///
/// [`Collection::name`] is also the top-level key of the collection in the
/// persisted JSON document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Butterflies,
    Users,
    Ratings,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Self::Butterflies, Self::Users, Self::Ratings];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Butterflies => "butterflies",
            Self::Users => "users",
            Self::Ratings => "ratings",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| TypeError::UnknownCollection(s.to_string()))
    }
}

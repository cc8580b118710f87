//! Demo dataset installed by `bfly init-db`.

use bfly_types::{Butterfly, Rating, RecordId, User};
use serde_json::Number;

use crate::document::StoreDocument;

const BUTTERFLIES: &[(&str, &str, &str)] = &[
    ("GI9_EuH8s1", "Zebra Swallowtail", "Protographium marcellus"),
    ("xRKSdjkBt4", "Plum Judy", "Abisara echerius"),
    ("0MUBKMu07U", "Red Pierrot", "Talicada nyseus"),
    ("NLktii5zvK", "Texan Crescentspot", "Anthanassa texana"),
    ("SMyaT24g-N", "Guava Skipper", "Phocides polybius"),
    ("DCenP4kQNQ", "Mexican Bluewing", "Myscelia ethusa"),
];

const USERS: &[(&str, &str)] = &[
    ("OOWzUaHLsK", "iluvbutterflies"),
    ("sdmU7-wkQX", "flutterby"),
    ("aqekk3t4kw", "metamorphosize_me"),
];

// (id, butterflyId, userId, rating)
const RATINGS: &[(&str, &str, &str, u64)] = &[
    ("Rt3kZq9aLw", "GI9_EuH8s1", "OOWzUaHLsK", 3),
    ("Rb7Hn2xPcE", "xRKSdjkBt4", "OOWzUaHLsK", 5),
    ("Rm0QeV5tYs", "0MUBKMu07U", "OOWzUaHLsK", 2),
    ("Rj8Ud4-GfK", "NLktii5zvK", "OOWzUaHLsK", 4),
    ("Rc1Wp6_oNa", "SMyaT24g-N", "OOWzUaHLsK", 5),
    ("Rz5Ly0sDqM", "SMyaT24g-N", "sdmU7-wkQX", 1),
    ("Rx2Bg7vJhT", "DCenP4kQNQ", "sdmU7-wkQX", 3),
];

/// Six butterflies, three users, and seven ratings from two of the users.
pub fn demo_document() -> StoreDocument {
    StoreDocument {
        butterflies: BUTTERFLIES
            .iter()
            .map(|(id, common_name, species)| Butterfly {
                id: RecordId::new(*id),
                common_name: common_name.to_string(),
                species: species.to_string(),
                article: format!("https://en.wikipedia.org/wiki/{}", species.replace(' ', "_")),
                extra: Default::default(),
            })
            .collect(),
        users: USERS
            .iter()
            .map(|(id, username)| User {
                id: RecordId::new(*id),
                username: username.to_string(),
                extra: Default::default(),
            })
            .collect(),
        ratings: RATINGS
            .iter()
            .map(|(id, butterfly_id, user_id, rating)| Rating {
                id: RecordId::new(*id),
                butterfly_id: butterfly_id.to_string(),
                user_id: user_id.to_string(),
                rating: Number::from(*rating),
                extra: Default::default(),
            })
            .collect(),
    }
}

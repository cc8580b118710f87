//! Schemas for the three record kinds and their typed parse steps.

use bfly_types::{Collection, NewButterfly, NewRating, NewUser};
use serde_json::Value;

use crate::error::ValidationResult;
use crate::schema::{FieldKind, Schema};

pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 5.0;

pub fn butterfly_schema() -> Schema {
    Schema::new(Collection::Butterflies)
        .required("commonName", FieldKind::String)
        .required("species", FieldKind::String)
        .required("article", FieldKind::String)
}

pub fn user_schema() -> Schema {
    Schema::new(Collection::Users).required("username", FieldKind::String)
}

pub fn rating_schema() -> Schema {
    Schema::new(Collection::Ratings)
        .required("butterflyId", FieldKind::String)
        .required("userId", FieldKind::String)
        .required(
            "rating",
            FieldKind::Number {
                min: RATING_MIN,
                max: RATING_MAX,
            },
        )
}

pub fn schema_for(collection: Collection) -> Schema {
    match collection {
        Collection::Butterflies => butterfly_schema(),
        Collection::Users => user_schema(),
        Collection::Ratings => rating_schema(),
    }
}

pub fn validate_butterfly(value: &Value) -> ValidationResult<()> {
    butterfly_schema().validate(value)
}

pub fn validate_user(value: &Value) -> ValidationResult<()> {
    user_schema().validate(value)
}

pub fn validate_rating(value: &Value) -> ValidationResult<()> {
    rating_schema().validate(value)
}

pub fn parse_butterfly(value: &Value) -> ValidationResult<NewButterfly> {
    butterfly_schema().parse(value)
}

pub fn parse_user(value: &Value) -> ValidationResult<NewUser> {
    user_schema().parse(value)
}

pub fn parse_rating(value: &Value) -> ValidationResult<NewRating> {
    rating_schema().parse(value)
}

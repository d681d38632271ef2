//! Reference data lookups - resolving human-readable input against the
//! read-only catalog of countries, cities, polos, and courses.
//!
//! All lookups are pure reads. A miss is a field-level validation failure:
//! the returned [`Error::ReferenceNotFound`] names the input field so callers
//! can surface it against the offending form field.

use crate::{
    entities::{City, Country, Course, Polo, city, country, course, polo},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, prelude::*};

/// Resolves a country by its two-letter code.
pub async fn lookup_country_by_code<C>(db: &C, code: &str) -> Result<country::Model>
where
    C: ConnectionTrait,
{
    Country::find()
        .filter(country::Column::Code.eq(code))
        .one(db)
        .await?
        .ok_or_else(|| Error::ReferenceNotFound {
            field: "nationality",
            value: code.to_string(),
        })
}

/// Resolves a city by exact name. `field` names the input field being
/// resolved (birthplace vs. address city) for error reporting.
pub async fn lookup_city_by_name<C>(db: &C, name: &str, field: &'static str) -> Result<city::Model>
where
    C: ConnectionTrait,
{
    City::find()
        .filter(city::Column::Name.eq(name))
        .one(db)
        .await?
        .ok_or_else(|| Error::ReferenceNotFound {
            field,
            value: name.to_string(),
        })
}

/// Resolves an offering site by exact name.
pub async fn lookup_polo_by_name<C>(db: &C, name: &str) -> Result<polo::Model>
where
    C: ConnectionTrait,
{
    Polo::find()
        .filter(polo::Column::Name.eq(name))
        .one(db)
        .await?
        .ok_or_else(|| Error::ReferenceNotFound {
            field: "polo",
            value: name.to_string(),
        })
}

/// Resolves a course by id.
pub async fn lookup_course<C>(db: &C, course_id: i64) -> Result<course::Model>
where
    C: ConnectionTrait,
{
    Course::find_by_id(course_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ReferenceNotFound {
            field: "course",
            value: course_id.to_string(),
        })
}

/// Partial-name city search backing the registration form's autocomplete.
pub async fn search_cities(db: &DatabaseConnection, partial_name: &str) -> Result<Vec<city::Model>> {
    City::find()
        .filter(city::Column::Name.contains(partial_name))
        .order_by_asc(city::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists offering sites, optionally filtered by name substring and city.
pub async fn list_polos(
    db: &DatabaseConnection,
    name: Option<&str>,
    city_id: Option<i64>,
) -> Result<Vec<polo::Model>> {
    let mut query = Polo::find();
    if let Some(name) = name {
        query = query.filter(polo::Column::Name.contains(name));
    }
    if let Some(city_id) = city_id {
        query = query.filter(polo::Column::CityId.eq(city_id));
    }
    query
        .order_by_asc(polo::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

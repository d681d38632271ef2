//! Country entity - read-only reference table of countries.
//!
//! Looked up by two-letter code when resolving a candidate's nationality.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Country database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "countries")]
pub struct Model {
    /// Unique identifier for the country
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Country name
    pub name: String,
    /// Two-letter country code (e.g. `"BR"`), the public lookup key
    #[sea_orm(unique)]
    pub code: String,
}

/// Countries are referenced by candidates (nationality) and own states
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One country has many federative states
    #[sea_orm(has_many = "super::state::Entity")]
    States,
}

impl Related<super::state::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::States.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! State entity - read-only reference table of federative states.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// State database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "states")]
pub struct Model {
    /// Unique identifier for the state
    #[sea_orm(primary_key)]
    pub id: i64,
    /// State name
    pub name: String,
    /// Two-letter state abbreviation (e.g. `"SP"`)
    pub uf: String,
    /// Country this state belongs to
    pub country_id: i64,
}

/// Defines relationships between State and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each state belongs to one country
    #[sea_orm(
        belongs_to = "super::country::Entity",
        from = "Column::CountryId",
        to = "super::country::Column::Id"
    )]
    Country,
    /// One state has many cities
    #[sea_orm(has_many = "super::city::Entity")]
    Cities,
}

impl Related<super::country::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Country.def()
    }
}

impl Related<super::city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

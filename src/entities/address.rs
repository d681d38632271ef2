//! Address entity - one address snapshot per candidate row, taken at
//! registration time. Not shared between candidates.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Address database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    /// Unique identifier for the address
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Candidate this address belongs to
    pub candidate_id: i64,
    /// Urban/rural area (enumerated code)
    pub area: i32,
    /// Postal code
    pub postal_code: String,
    /// Free-text state as typed by the candidate
    pub state: String,
    /// Free-text city as typed by the candidate
    pub city: String,
    /// Normalized city reference, resolved from the free-text name
    pub city_id: Option<i64>,
    /// District / neighborhood
    pub district: String,
    /// Street address
    pub street: String,
    /// Street number (free text; can carry "s/n")
    pub number: String,
    /// Optional complement
    pub complement: Option<String>,
}

/// Defines relationships between Address and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each address belongs to one candidate
    #[sea_orm(
        belongs_to = "super::candidate::Entity",
        from = "Column::CandidateId",
        to = "super::candidate::Column::Id"
    )]
    Candidate,
    /// Each address may reference one normalized city
    #[sea_orm(
        belongs_to = "super::city::Entity",
        from = "Column::CityId",
        to = "super::city::Column::Id"
    )]
    City,
}

impl Related<super::candidate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Candidate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Polo entity - a physical/administrative site offering courses.
//!
//! Looked up by name when resolving a candidate's offering site.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Polo (offering site) database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "polos")]
pub struct Model {
    /// Unique identifier for the polo
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Site name, the public lookup key
    pub name: String,
    /// Street address
    pub street: String,
    /// Street number
    pub number: i32,
    /// District / neighborhood
    pub district: String,
    /// City the site is located in
    pub city_id: Option<i64>,
}

/// Defines relationships between Polo and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each polo may be located in one city
    #[sea_orm(
        belongs_to = "super::city::Entity",
        from = "Column::CityId",
        to = "super::city::Column::Id"
    )]
    City,
    /// One polo offers many courses through the association table
    #[sea_orm(has_many = "super::course_polo::Entity")]
    CoursePolos,
}

impl Related<super::city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::City.def()
    }
}

impl Related<super::course_polo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoursePolos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

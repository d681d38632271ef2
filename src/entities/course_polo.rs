//! CoursePolo entity - many-to-many association between courses and polos.
//!
//! Rows are replaced wholesale when an admin edits a course's site list,
//! never diffed incrementally.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Course/polo association database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_polos")]
pub struct Model {
    /// Unique identifier for the association row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Associated course
    pub course_id: i64,
    /// Associated polo
    pub polo_id: i64,
}

/// Defines relationships between CoursePolo and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each association row belongs to one course
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    /// Each association row belongs to one polo
    #[sea_orm(
        belongs_to = "super::polo::Entity",
        from = "Column::PoloId",
        to = "super::polo::Column::Id"
    )]
    Polo,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::polo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Polo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

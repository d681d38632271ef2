//! EducationHistory entity - one education record per candidate row.
//!
//! Created alongside the candidate at registration; on candidate update it is
//! created if absent, else updated in place.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Education history database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "education_histories")]
pub struct Model {
    /// Unique identifier for the record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Candidate this record belongs to
    pub candidate_id: i64,
    /// Public/private school (enumerated code)
    pub school_type: i32,
    /// Education level attained (enumerated code)
    pub education_level: i32,
    /// Opaque blob name of the attached transcript image
    pub transcript_document: Option<String>,
}

/// Defines relationships between EducationHistory and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each education history belongs to one candidate
    #[sea_orm(
        belongs_to = "super::candidate::Entity",
        from = "Column::CandidateId",
        to = "super::candidate::Column::Id"
    )]
    Candidate,
}

impl Related<super::candidate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Candidate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

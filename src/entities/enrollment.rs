//! Enrollment entity - a candidate's application to one course, the unit of
//! the status state machine.
//!
//! The `access_hash` is an unguessable capability token generated once at
//! creation; it is the sole credential for unauthenticated self-service
//! access to the enrollment. `status` only ever moves along the transitions
//! enforced by [`crate::core::enrollment`]; every change is mirrored by one
//! append-only log row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an enrollment, stored as an integer column.
///
/// `AutoApproved` is reached only via expiration of the course's *validation*
/// deadline; expiration of the *registration* deadline routes to `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum EnrollmentStatus {
    /// Submitted, awaiting admin review
    #[sea_orm(num_value = 0)]
    Pending = 0,
    /// Approved by an admin (terminal)
    #[sea_orm(num_value = 1)]
    Approved = 1,
    /// Rejected by an admin or by registration-deadline expiry (terminal)
    #[sea_orm(num_value = 2)]
    Rejected = 2,
    /// Approved automatically by validation-deadline expiry (terminal)
    #[sea_orm(num_value = 3)]
    AutoApproved = 3,
}

impl EnrollmentStatus {
    /// Whether the status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Enrollment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    /// Unique identifier for the enrollment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Candidate row this enrollment belongs to
    pub candidate_id: i64,
    /// Course the candidate applied to
    pub course_id: i64,
    /// Bearer capability token, 128 hex chars of a salted SHA-512 digest
    #[sea_orm(unique)]
    pub access_hash: String,
    /// Current lifecycle status
    pub status: EnrollmentStatus,
    /// When the enrollment was created
    pub created_at: DateTimeWithTimeZone,
    /// When the enrollment last changed (equals `created_at` at creation)
    pub modified_at: DateTimeWithTimeZone,
}

/// Defines relationships between Enrollment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each enrollment belongs to one candidate row
    #[sea_orm(
        belongs_to = "super::candidate::Entity",
        from = "Column::CandidateId",
        to = "super::candidate::Column::Id"
    )]
    Candidate,
    /// Each enrollment targets one course
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    /// One enrollment owns its append-only log rows
    #[sea_orm(has_many = "super::enrollment_log::Entity")]
    Logs,
}

impl Related<super::candidate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Candidate.def()
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::enrollment_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Logs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

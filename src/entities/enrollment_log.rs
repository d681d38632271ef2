//! EnrollmentLog entity - append-only audit trail of status transitions.
//!
//! One row is written for every transition, manual or automatic. Rows are
//! never mutated or deleted. `actor_admin_id` is `None` for transitions the
//! expiration scheduler performs.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enrollment::EnrollmentStatus;

/// Enrollment log database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollment_logs")]
pub struct Model {
    /// Unique identifier for the log row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Enrollment this row belongs to
    pub enrollment_id: i64,
    /// Status the enrollment held when the row was written (the new status
    /// of the transition)
    pub status: EnrollmentStatus,
    /// Observational note; rejection reasons land here
    pub note: Option<String>,
    /// Acting admin for manual transitions, `None` for system-initiated ones
    pub actor_admin_id: Option<i64>,
    /// When the transition was recorded
    pub recorded_at: DateTimeWithTimeZone,
}

/// Defines relationships between EnrollmentLog and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each log row belongs to one enrollment
    #[sea_orm(
        belongs_to = "super::enrollment::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollment::Column::Id"
    )]
    Enrollment,
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

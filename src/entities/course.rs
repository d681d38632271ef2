//! Course entity - a long-lived offering candidates enroll into.
//!
//! Carries the two independent deadline fields driving automatic expiration:
//! `registration_deadline` (past it, pending enrollments are rejected) and
//! `validation_deadline` (past it, pending enrollments are auto-approved).
//! They must stay separate named columns; the two scheduler scans compare
//! against different fields.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Course database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    /// Unique identifier for the course
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Course name
    pub name: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Cutoff for accepting new registrations; pending enrollments past it
    /// are rejected by the scheduler
    pub registration_deadline: DateTimeWithTimeZone,
    /// Later cutoff for manual review; pending enrollments past it are
    /// auto-approved by the scheduler
    pub validation_deadline: DateTimeWithTimeZone,
    /// Workload in hours, non-negative
    pub workload_hours: f64,
    /// Free-text prerequisites
    pub prerequisites: Option<String>,
}

/// Defines relationships between Course and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One course has many enrollments
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
    /// One course is offered at many polos through the association table
    #[sea_orm(has_many = "super::course_polo::Entity")]
    CoursePolos,
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::course_polo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoursePolos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Database configuration module.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Tables
//! are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL. On top of the generated tables this
//! module adds the uniqueness indexes that back the admission-control
//! invariants at the storage layer.

use crate::entities::{
    Address, Candidate, City, Country, Course, CoursePolo, EducationHistory, Enrollment,
    EnrollmentLog, Polo, State, candidate, course_polo, enrollment,
};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables and indexes from the entity definitions.
///
/// Safe to call on an existing database; every statement is issued with
/// `IF NOT EXISTS`.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Reference data first, then the tables referencing it
    let mut statements = vec![
        schema.create_table_from_entity(Country),
        schema.create_table_from_entity(State),
        schema.create_table_from_entity(City),
        schema.create_table_from_entity(Polo),
        schema.create_table_from_entity(Course),
        schema.create_table_from_entity(CoursePolo),
        schema.create_table_from_entity(Candidate),
        schema.create_table_from_entity(Address),
        schema.create_table_from_entity(EducationHistory),
        schema.create_table_from_entity(Enrollment),
        schema.create_table_from_entity(EnrollmentLog),
    ];
    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(&*statement)).await?;
    }

    // A candidate row carries exactly one enrollment, so (candidate_id,
    // course_id) uniqueness guards the duplicate-submission invariant even
    // under concurrent submissions.
    db.execute(
        builder.build(
            Index::create()
                .name("idx_unique_enrollment_candidate_course")
                .table(Enrollment)
                .col(enrollment::Column::CandidateId)
                .col(enrollment::Column::CourseId)
                .unique()
                .if_not_exists(),
        ),
    )
    .await?;

    // Course/polo pairs are unique; the site list is replaced wholesale on
    // course update.
    db.execute(
        builder.build(
            Index::create()
                .name("idx_unique_course_polo")
                .table(CoursePolo)
                .col(course_polo::Column::CourseId)
                .col(course_polo::Column::PoloId)
                .unique()
                .if_not_exists(),
        ),
    )
    .await?;

    // The duplicate and quota checks scan candidates by national id.
    db.execute(
        builder.build(
            Index::create()
                .name("idx_candidate_national_id")
                .table(Candidate)
                .col(candidate::Column::NationalId)
                .if_not_exists(),
        ),
    )
    .await?;

    Ok(())
}

//! Course administration: creating and editing offerings and their site
//! lists, plus the filtered listings the public catalog serves.
//!
//! A course's polo list is replaced wholesale on every edit. The two deadline
//! columns are independent and both mandatory; the expiration scans in
//! `core::expiration` compare against them separately.

use crate::{
    core::reference,
    entities::{Course, CoursePolo, Polo, course, course_polo, polo},
    errors::{Error, Result},
};
use sea_orm::{
    ActiveValue::Set, JoinType, NotSet, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use tracing::info;

/// Payload for creating a course.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CourseInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub registration_deadline: DateTimeWithTimeZone,
    pub validation_deadline: DateTimeWithTimeZone,
    pub workload_hours: f64,
    #[serde(default)]
    pub prerequisites: Option<String>,
    /// Sites offering the course
    #[serde(default)]
    pub polo_ids: Vec<i64>,
}

/// Partial update of a course. Absent fields keep their current value;
/// `polo_ids`, when present, replaces the whole site list.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct CourseUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub registration_deadline: Option<DateTimeWithTimeZone>,
    #[serde(default)]
    pub validation_deadline: Option<DateTimeWithTimeZone>,
    #[serde(default)]
    pub workload_hours: Option<f64>,
    #[serde(default)]
    pub prerequisites: Option<String>,
    #[serde(default)]
    pub polo_ids: Option<Vec<i64>>,
}

/// Catalog listing filters. All optional and combined with AND.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    /// Substring match on the course name
    pub name: Option<String>,
    /// Only courses still accepting registrations after this instant
    pub open_after: Option<DateTimeWithTimeZone>,
    /// Only courses offered at this site
    pub polo_id: Option<i64>,
}

fn validate_input(name: &str, workload_hours: f64) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "course name cannot be empty".to_string(),
        });
    }
    if workload_hours < 0.0 {
        return Err(Error::Config {
            message: "course workload cannot be negative".to_string(),
        });
    }
    Ok(())
}

async fn replace_polos<C>(db: &C, course_id: i64, polo_ids: &[i64]) -> Result<()>
where
    C: ConnectionTrait,
{
    CoursePolo::delete_many()
        .filter(course_polo::Column::CourseId.eq(course_id))
        .exec(db)
        .await?;
    for polo_id in polo_ids {
        // Verify the site exists so a bad id fails as a reference error
        // rather than a dangling row
        Polo::find_by_id(*polo_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::ReferenceNotFound {
                field: "polo",
                value: polo_id.to_string(),
            })?;
        course_polo::ActiveModel {
            id: NotSet,
            course_id: Set(course_id),
            polo_id: Set(*polo_id),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

/// Creates a course together with its site list, in one transaction.
pub async fn create_course(
    db: &DatabaseConnection,
    input: &CourseInput,
) -> Result<course::Model> {
    validate_input(&input.name, input.workload_hours)?;

    let txn = db.begin().await?;
    let row = course::ActiveModel {
        id: NotSet,
        name: Set(input.name.clone()),
        description: Set(input.description.clone()),
        registration_deadline: Set(input.registration_deadline),
        validation_deadline: Set(input.validation_deadline),
        workload_hours: Set(input.workload_hours),
        prerequisites: Set(input.prerequisites.clone()),
    }
    .insert(&txn)
    .await?;
    replace_polos(&txn, row.id, &input.polo_ids).await?;
    txn.commit().await?;

    info!(course_id = row.id, name = %row.name, "course created");
    Ok(row)
}

/// Applies a partial update to a course. When `polo_ids` is present the site
/// list is replaced wholesale.
pub async fn update_course(
    db: &DatabaseConnection,
    course_id: i64,
    update: &CourseUpdate,
) -> Result<course::Model> {
    if let Some(name) = &update.name {
        validate_input(name, update.workload_hours.unwrap_or(0.0))?;
    } else if let Some(workload_hours) = update.workload_hours {
        validate_input("unchanged", workload_hours)?;
    }

    let txn = db.begin().await?;
    let existing = reference::lookup_course(&txn, course_id).await?;

    let mut row: course::ActiveModel = existing.into();
    if let Some(name) = &update.name {
        row.name = Set(name.clone());
    }
    if let Some(description) = &update.description {
        row.description = Set(Some(description.clone()));
    }
    if let Some(registration_deadline) = update.registration_deadline {
        row.registration_deadline = Set(registration_deadline);
    }
    if let Some(validation_deadline) = update.validation_deadline {
        row.validation_deadline = Set(validation_deadline);
    }
    if let Some(workload_hours) = update.workload_hours {
        row.workload_hours = Set(workload_hours);
    }
    if let Some(prerequisites) = &update.prerequisites {
        row.prerequisites = Set(Some(prerequisites.clone()));
    }
    let updated = row.update(&txn).await?;

    if let Some(polo_ids) = &update.polo_ids {
        replace_polos(&txn, course_id, polo_ids).await?;
    }
    txn.commit().await?;

    info!(course_id, "course updated");
    Ok(updated)
}

/// Lists courses matching the filter, ordered by registration deadline.
pub async fn list_courses(
    db: &DatabaseConnection,
    filter: &CourseFilter,
) -> Result<Vec<course::Model>> {
    let mut query = Course::find();
    if let Some(name) = &filter.name {
        query = query.filter(course::Column::Name.contains(name));
    }
    if let Some(open_after) = filter.open_after {
        query = query.filter(course::Column::RegistrationDeadline.gt(open_after));
    }
    if let Some(polo_id) = filter.polo_id {
        query = query
            .join(JoinType::InnerJoin, course::Relation::CoursePolos.def())
            .filter(course_polo::Column::PoloId.eq(polo_id));
    }
    query
        .order_by_asc(course::Column::RegistrationDeadline)
        .order_by_asc(course::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The sites offering one course.
pub async fn polos_for_course<C>(db: &C, course_id: i64) -> Result<Vec<polo::Model>>
where
    C: ConnectionTrait,
{
    Polo::find()
        .join(JoinType::InnerJoin, polo::Relation::CoursePolos.def())
        .filter(course_polo::Column::CourseId.eq(course_id))
        .order_by_asc(polo::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

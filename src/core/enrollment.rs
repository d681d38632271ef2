//! Enrollment lifecycle: submission with admission control, the status state
//! machine, capability-token access, and the audit log.
//!
//! Admission control runs inside the submission transaction: the duplicate
//! check (one enrollment per national id per course, counting terminal
//! states) and the quota check (at most [`ENROLLMENT_QUOTA`] enrollments per
//! national id) both pass before any row is written, and the candidate plus
//! enrollment rows commit atomically. Every status change appends exactly one
//! `enrollment_logs` row inside the same transaction as the change itself.

use crate::{
    core::{
        candidate::{self, CandidateInput, CandidateUpdate},
        clock,
        course::polos_for_course,
        notify::{self, NotificationEvent, NotificationSink},
        reference,
    },
    entities::{
        Address, Candidate, EducationHistory, Enrollment, EnrollmentLog, address,
        candidate as candidate_entity, education_history, enrollment, enrollment_log,
    },
    errors::{Error, Result},
};
use rand::RngCore;
use sea_orm::{
    ActiveValue::Set, JoinType, NotSet, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use sha2::{Digest, Sha512};
use tracing::info;

pub use crate::entities::enrollment::EnrollmentStatus;

/// Maximum number of enrollments one national id may hold, across all
/// statuses.
pub const ENROLLMENT_QUOTA: u64 = 3;

/// A complete registration: the target course plus the candidate payload.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RegistrationInput {
    pub course_id: i64,
    pub candidate: CandidateInput,
}

/// Rows created by a successful submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub enrollment: enrollment::Model,
    pub candidate: candidate_entity::Model,
}

/// Derives the capability token for a new enrollment: a salted SHA-512
/// digest, 128 hex characters. The fresh random salt makes the token
/// unguessable even for identical inputs; the free-text form timestamp is
/// folded in as extra entropy and never parsed.
fn generate_access_hash(national_id: &str, candidate_id: i64, submitted_at: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut hasher = Sha512::new();
    hasher.update(national_id.as_bytes());
    hasher.update(candidate_id.to_be_bytes());
    hasher.update(salt);
    hasher.update(submitted_at.as_bytes());
    hex::encode(hasher.finalize())
}

fn log_row(
    enrollment_id: i64,
    status: EnrollmentStatus,
    note: Option<String>,
    actor_admin_id: Option<i64>,
    recorded_at: DateTimeWithTimeZone,
) -> enrollment_log::ActiveModel {
    enrollment_log::ActiveModel {
        id: NotSet,
        enrollment_id: Set(enrollment_id),
        status: Set(status),
        note: Set(note),
        actor_admin_id: Set(actor_admin_id),
        recorded_at: Set(recorded_at),
    }
}

/// Counts enrollments held by a national id, optionally restricted to one
/// course. Terminal enrollments count: a rejected submission still blocks
/// resubmission for the same course and still consumes quota.
async fn enrollments_held<C>(db: &C, national_id: &str, course_id: Option<i64>) -> Result<u64>
where
    C: ConnectionTrait,
{
    let mut query = Enrollment::find()
        .join(JoinType::InnerJoin, enrollment::Relation::Candidate.def())
        .filter(candidate_entity::Column::NationalId.eq(national_id));
    if let Some(course_id) = course_id {
        query = query.filter(enrollment::Column::CourseId.eq(course_id));
    }
    query.count(db).await.map_err(Into::into)
}

/// Submits a registration: admission control, candidate creation, enrollment
/// creation, all in one transaction. Dispatches the registered notification
/// only after the transaction commits.
pub async fn submit_enrollment(
    db: &DatabaseConnection,
    sink: &dyn NotificationSink,
    input: &RegistrationInput,
) -> Result<Submission> {
    let course = reference::lookup_course(db, input.course_id).await?;
    let refs = candidate::resolve_references(db, &input.candidate).await?;

    let txn = db.begin().await?;

    let national_id = &input.candidate.national_id;
    if enrollments_held(&txn, national_id, Some(course.id)).await? > 0 {
        return Err(Error::DuplicateEnrollment {
            national_id: national_id.clone(),
            course_id: course.id,
        });
    }
    let held = enrollments_held(&txn, national_id, None).await?;
    if held >= ENROLLMENT_QUOTA {
        return Err(Error::QuotaExceeded {
            national_id: national_id.clone(),
            count: held,
        });
    }

    let candidate_row = candidate::create_candidate(&txn, &input.candidate, &refs).await?;
    let now = clock::civil_now();
    let access_hash = generate_access_hash(
        national_id,
        candidate_row.id,
        input.candidate.submitted_at.as_deref().unwrap_or(""),
    );
    let enrollment_row = enrollment::ActiveModel {
        id: NotSet,
        candidate_id: Set(candidate_row.id),
        course_id: Set(course.id),
        access_hash: Set(access_hash.clone()),
        status: Set(EnrollmentStatus::Pending),
        created_at: Set(now),
        modified_at: Set(now),
    }
    .insert(&txn)
    .await?;
    log_row(enrollment_row.id, EnrollmentStatus::Pending, None, None, now)
        .insert(&txn)
        .await?;

    txn.commit().await?;

    info!(
        enrollment_id = enrollment_row.id,
        course_id = course.id,
        "enrollment submitted"
    );
    notify::dispatch(
        sink,
        &NotificationEvent::registered(&candidate_row, &course, &access_hash),
    );

    Ok(Submission {
        enrollment: enrollment_row,
        candidate: candidate_row,
    })
}

/// Moves a pending enrollment to a terminal status, writing the log row and
/// the status change in one transaction. Returns the updated enrollment plus
/// the candidate and course for notification purposes.
async fn transition(
    db: &DatabaseConnection,
    enrollment_id: i64,
    to: EnrollmentStatus,
    note: Option<String>,
    actor_admin_id: Option<i64>,
) -> Result<(
    enrollment::Model,
    candidate_entity::Model,
    crate::entities::CourseModel,
)> {
    let txn = db.begin().await?;

    let existing = Enrollment::find_by_id(enrollment_id)
        .one(&txn)
        .await?
        .ok_or(Error::EnrollmentNotFound { id: enrollment_id })?;
    if existing.status.is_terminal() {
        return Err(Error::InvalidTransition {
            from: existing.status,
            to,
        });
    }

    let now = clock::civil_now();
    log_row(enrollment_id, to, note, actor_admin_id, now)
        .insert(&txn)
        .await?;

    let candidate_id = existing.candidate_id;
    let course_id = existing.course_id;
    let mut row: enrollment::ActiveModel = existing.into();
    row.status = Set(to);
    row.modified_at = Set(now);
    let updated = row.update(&txn).await?;

    let candidate_row = Candidate::find_by_id(candidate_id)
        .one(&txn)
        .await?
        .ok_or(Error::CandidateNotFound { id: candidate_id })?;
    let course = reference::lookup_course(&txn, course_id).await?;

    txn.commit().await?;
    Ok((updated, candidate_row, course))
}

/// Approves a pending enrollment on behalf of an administrator.
pub async fn approve(
    db: &DatabaseConnection,
    sink: &dyn NotificationSink,
    enrollment_id: i64,
    admin_id: i64,
) -> Result<enrollment::Model> {
    let (updated, candidate_row, course) = transition(
        db,
        enrollment_id,
        EnrollmentStatus::Approved,
        None,
        Some(admin_id),
    )
    .await?;
    info!(enrollment_id, admin_id, "enrollment approved");
    notify::dispatch(sink, &NotificationEvent::approved(&candidate_row, &course));
    Ok(updated)
}

/// Rejects a pending enrollment. The reason is mandatory; it lands in the
/// log row and is relayed to the candidate.
pub async fn reject(
    db: &DatabaseConnection,
    sink: &dyn NotificationSink,
    enrollment_id: i64,
    admin_id: i64,
    reason: &str,
) -> Result<enrollment::Model> {
    if reason.trim().is_empty() {
        return Err(Error::MissingRejectionReason);
    }
    let (updated, candidate_row, course) = transition(
        db,
        enrollment_id,
        EnrollmentStatus::Rejected,
        Some(reason.to_string()),
        Some(admin_id),
    )
    .await?;
    info!(enrollment_id, admin_id, reason, "enrollment rejected");
    notify::dispatch(
        sink,
        &NotificationEvent::rejected(&candidate_row, &course, reason),
    );
    Ok(updated)
}

/// One enrollment joined with its course, for self-service display.
#[derive(Debug, Clone)]
pub struct EnrollmentWithCourse {
    pub enrollment: enrollment::Model,
    pub course: crate::entities::CourseModel,
}

/// One candidate row with all its enrollments.
#[derive(Debug, Clone)]
pub struct CandidateSummary {
    pub candidate: candidate_entity::Model,
    pub enrollments: Vec<EnrollmentWithCourse>,
}

/// Resolves an access hash to every enrollment its holder owns: the hash
/// anchors one enrollment, and the result covers all candidate rows sharing
/// that candidate's national id.
pub async fn find_by_access_hash(
    db: &DatabaseConnection,
    access_hash: &str,
) -> Result<Vec<CandidateSummary>> {
    let anchor = Enrollment::find()
        .filter(enrollment::Column::AccessHash.eq(access_hash))
        .one(db)
        .await?
        .ok_or(Error::AccessDenied)?;
    let anchor_candidate = Candidate::find_by_id(anchor.candidate_id)
        .one(db)
        .await?
        .ok_or(Error::CandidateNotFound {
            id: anchor.candidate_id,
        })?;

    let candidates = Candidate::find()
        .filter(candidate_entity::Column::NationalId.eq(&anchor_candidate.national_id))
        .order_by_asc(candidate_entity::Column::Id)
        .all(db)
        .await?;

    let mut summaries = Vec::with_capacity(candidates.len());
    for candidate_row in candidates {
        let rows = Enrollment::find()
            .filter(enrollment::Column::CandidateId.eq(candidate_row.id))
            .find_also_related(crate::entities::Course)
            .order_by_asc(enrollment::Column::Id)
            .all(db)
            .await?;
        let mut enrollments = Vec::with_capacity(rows.len());
        for (enrollment_row, course) in rows {
            let course = course.ok_or(Error::ReferenceNotFound {
                field: "course",
                value: enrollment_row.course_id.to_string(),
            })?;
            enrollments.push(EnrollmentWithCourse {
                enrollment: enrollment_row,
                course,
            });
        }
        summaries.push(CandidateSummary {
            candidate: candidate_row,
            enrollments,
        });
    }
    Ok(summaries)
}

/// Everything the self-service correction form displays for one enrollment.
#[derive(Debug, Clone)]
pub struct EnrollmentDetail {
    pub enrollment: enrollment::Model,
    pub candidate: candidate_entity::Model,
    pub course: crate::entities::CourseModel,
    pub address: Option<crate::entities::AddressModel>,
    pub education: Option<crate::entities::EducationHistoryModel>,
    /// Sites offering the enrollment's course, for the polo picker
    pub polo_options: Vec<crate::entities::PoloModel>,
}

/// Loads the full detail view of one enrollment. The access hash must match
/// the enrollment; a mismatch is indistinguishable from a missing hash.
pub async fn enrollment_detail(
    db: &DatabaseConnection,
    enrollment_id: i64,
    access_hash: &str,
) -> Result<EnrollmentDetail> {
    let enrollment_row = Enrollment::find_by_id(enrollment_id)
        .filter(enrollment::Column::AccessHash.eq(access_hash))
        .one(db)
        .await?
        .ok_or(Error::AccessDenied)?;
    let candidate_row = Candidate::find_by_id(enrollment_row.candidate_id)
        .one(db)
        .await?
        .ok_or(Error::CandidateNotFound {
            id: enrollment_row.candidate_id,
        })?;
    let course = reference::lookup_course(db, enrollment_row.course_id).await?;
    let address_row = Address::find()
        .filter(address::Column::CandidateId.eq(candidate_row.id))
        .one(db)
        .await?;
    let education_row = EducationHistory::find()
        .filter(education_history::Column::CandidateId.eq(candidate_row.id))
        .one(db)
        .await?;
    let polo_options = polos_for_course(db, course.id).await?;

    Ok(EnrollmentDetail {
        enrollment: enrollment_row,
        candidate: candidate_row,
        course,
        address: address_row,
        education: education_row,
        polo_options,
    })
}

/// Applies a self-service correction to a pending enrollment: candidate data
/// changes plus an optional course switch, logged, all in one transaction.
///
/// Only pending enrollments can be corrected; a decided one must not be
/// editable from the candidate side. A course switch re-runs the duplicate
/// check against the new course.
pub async fn update_enrollment(
    db: &DatabaseConnection,
    enrollment_id: i64,
    access_hash: &str,
    update: &CandidateUpdate,
    new_course_id: Option<i64>,
) -> Result<enrollment::Model> {
    let txn = db.begin().await?;

    let existing = Enrollment::find_by_id(enrollment_id)
        .filter(enrollment::Column::AccessHash.eq(access_hash))
        .one(&txn)
        .await?
        .ok_or(Error::AccessDenied)?;
    if existing.status.is_terminal() {
        return Err(Error::InvalidTransition {
            from: existing.status,
            to: EnrollmentStatus::Pending,
        });
    }

    let candidate_row = candidate::apply_update(&txn, existing.candidate_id, update).await?;

    let now = clock::civil_now();
    let current_course_id = existing.course_id;
    let mut row: enrollment::ActiveModel = existing.into();
    if let Some(course_id) = new_course_id
        && course_id != current_course_id
    {
        let course = reference::lookup_course(&txn, course_id).await?;
        if enrollments_held(&txn, &candidate_row.national_id, Some(course.id)).await? > 0 {
            return Err(Error::DuplicateEnrollment {
                national_id: candidate_row.national_id.clone(),
                course_id: course.id,
            });
        }
        row.course_id = Set(course.id);
    }
    row.modified_at = Set(now);
    let updated = row.update(&txn).await?;

    log_row(
        updated.id,
        EnrollmentStatus::Pending,
        Some("enrollment data updated by candidate".to_string()),
        None,
        now,
    )
    .insert(&txn)
    .await?;

    txn.commit().await?;
    info!(enrollment_id, "enrollment updated by candidate");
    Ok(updated)
}

/// Admin listing filters. All optional and combined with AND.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnrollmentFilter {
    /// Only enrollments currently in this status
    pub status: Option<EnrollmentStatus>,
    /// Only enrollments targeting this course
    pub course_id: Option<i64>,
}

/// Lists enrollments for administrative review, oldest first so the review
/// queue surfaces the longest-waiting submissions.
pub async fn list_enrollments(
    db: &DatabaseConnection,
    filter: &EnrollmentFilter,
) -> Result<Vec<enrollment::Model>> {
    let mut query = Enrollment::find();
    if let Some(status) = filter.status {
        query = query.filter(enrollment::Column::Status.eq(status));
    }
    if let Some(course_id) = filter.course_id {
        query = query.filter(enrollment::Column::CourseId.eq(course_id));
    }
    query
        .order_by_asc(enrollment::Column::CreatedAt)
        .order_by_asc(enrollment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The audit trail of one enrollment, newest first.
pub async fn history(
    db: &DatabaseConnection,
    enrollment_id: i64,
) -> Result<Vec<enrollment_log::Model>> {
    Enrollment::find_by_id(enrollment_id)
        .one(db)
        .await?
        .ok_or(Error::EnrollmentNotFound { id: enrollment_id })?;
    EnrollmentLog::find()
        .filter(enrollment_log::Column::EnrollmentId.eq(enrollment_id))
        .order_by_desc(enrollment_log::Column::RecordedAt)
        .order_by_desc(enrollment_log::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

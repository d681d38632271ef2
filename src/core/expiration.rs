//! Deadline expiration: the two scans that decide stale pending enrollments.
//!
//! Scan one rejects pending enrollments whose course's registration deadline
//! has passed. Scan two auto-approves pending enrollments whose course's
//! validation deadline has passed. Each scan runs in its own transaction and
//! writes the log rows before the bulk status update, so a failure leaves
//! neither orphan logs nor unlogged transitions. Both scans filter on
//! `Pending`, which makes a repeated sweep a no-op.

use crate::{
    core::clock,
    entities::{Enrollment, EnrollmentLog, enrollment, enrollment_log},
    errors::Result,
};
use sea_orm::{
    ActiveValue::Set, JoinType, NotSet, QuerySelect, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use tracing::info;

use crate::entities::course;
use crate::entities::enrollment::EnrollmentStatus;

/// What one sweep did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Pending enrollments rejected because registration closed
    pub rejected: usize,
    /// Pending enrollments auto-approved because validation closed
    pub auto_approved: usize,
}

impl SweepOutcome {
    #[must_use]
    pub const fn total(self) -> usize {
        self.rejected + self.auto_approved
    }
}

/// Runs both expiration scans against the current civil time.
pub async fn run_sweep(db: &DatabaseConnection) -> Result<SweepOutcome> {
    run_sweep_at(db, clock::civil_now()).await
}

/// Runs both expiration scans against an explicit instant. The registration
/// scan runs first: an enrollment past both deadlines is rejected, not
/// auto-approved.
pub async fn run_sweep_at(
    db: &DatabaseConnection,
    now: DateTimeWithTimeZone,
) -> Result<SweepOutcome> {
    let rejected = transition_expired(
        db,
        now,
        course::Column::RegistrationDeadline,
        EnrollmentStatus::Rejected,
        "registration deadline expired",
    )
    .await?;
    let auto_approved = transition_expired(
        db,
        now,
        course::Column::ValidationDeadline,
        EnrollmentStatus::AutoApproved,
        "validation deadline expired",
    )
    .await?;

    let outcome = SweepOutcome {
        rejected,
        auto_approved,
    };
    if outcome.total() > 0 {
        info!(
            rejected = outcome.rejected,
            auto_approved = outcome.auto_approved,
            "expiration sweep transitioned enrollments"
        );
    }
    Ok(outcome)
}

/// One expiration scan: finds pending enrollments whose course deadline in
/// `deadline` lies before `now`, logs each, then bulk-updates their status.
/// Log rows and the status update share one transaction.
async fn transition_expired(
    db: &DatabaseConnection,
    now: DateTimeWithTimeZone,
    deadline: course::Column,
    new_status: EnrollmentStatus,
    note: &str,
) -> Result<usize> {
    let txn = db.begin().await?;

    let expired: Vec<enrollment::Model> = Enrollment::find()
        .join(JoinType::InnerJoin, enrollment::Relation::Course.def())
        .filter(enrollment::Column::Status.eq(EnrollmentStatus::Pending))
        .filter(deadline.lt(now))
        .all(&txn)
        .await?;
    if expired.is_empty() {
        txn.commit().await?;
        return Ok(0);
    }

    let logs: Vec<enrollment_log::ActiveModel> = expired
        .iter()
        .map(|row| enrollment_log::ActiveModel {
            id: NotSet,
            enrollment_id: Set(row.id),
            status: Set(new_status),
            note: Set(Some(note.to_string())),
            actor_admin_id: Set(None),
            recorded_at: Set(now),
        })
        .collect();
    EnrollmentLog::insert_many(logs).exec(&txn).await?;

    let ids: Vec<i64> = expired.iter().map(|row| row.id).collect();
    Enrollment::update_many()
        .col_expr(enrollment::Column::Status, Expr::value(new_status))
        .col_expr(enrollment::Column::ModifiedAt, Expr::value(now))
        .filter(enrollment::Column::Id.is_in(ids))
        .filter(enrollment::Column::Status.eq(EnrollmentStatus::Pending))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(expired.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::enrollment::{history, submit_enrollment};
    use crate::core::notify::test_sink::RecordingSink;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_registration_expiry_rejects_pending() -> Result<()> {
        let (db, _refs) = setup_with_reference_data().await?;
        let sink = RecordingSink::default();
        let course =
            create_test_course(&db, "Letters", days_from_now(1), days_from_now(20)).await?;
        let submission =
            submit_enrollment(&db, &sink, &sample_registration(course.id, "11122233344")).await?;

        let sweep_instant = days_from_now(2);
        let outcome = run_sweep_at(&db, sweep_instant).await?;
        assert_eq!(outcome.rejected, 1);
        assert_eq!(outcome.auto_approved, 0);

        let swept = Enrollment::find_by_id(submission.enrollment.id)
            .one(&db)
            .await?
            .expect("enrollment");
        assert_eq!(swept.status, EnrollmentStatus::Rejected);
        // The stamp is the same instant the deadline comparison used
        assert_eq!(swept.modified_at, sweep_instant);
        assert!(swept.modified_at > swept.created_at);

        let logs = history(&db, swept.id).await?;
        assert_eq!(logs[0].status, EnrollmentStatus::Rejected);
        assert_eq!(logs[0].note.as_deref(), Some("registration deadline expired"));
        assert_eq!(logs[0].actor_admin_id, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_validation_expiry_auto_approves_pending() -> Result<()> {
        let (db, _refs) = setup_with_reference_data().await?;
        let sink = RecordingSink::default();
        // Registration still open, validation window already closed
        let course =
            create_test_course(&db, "Letters", days_from_now(30), days_from_now(1)).await?;
        let submission =
            submit_enrollment(&db, &sink, &sample_registration(course.id, "11122233344")).await?;

        let outcome = run_sweep_at(&db, days_from_now(2)).await?;
        assert_eq!(outcome.rejected, 0);
        assert_eq!(outcome.auto_approved, 1);

        let swept = Enrollment::find_by_id(submission.enrollment.id)
            .one(&db)
            .await?
            .expect("enrollment");
        assert_eq!(swept.status, EnrollmentStatus::AutoApproved);

        let logs = history(&db, swept.id).await?;
        assert_eq!(logs[0].status, EnrollmentStatus::AutoApproved);
        assert_eq!(logs[0].note.as_deref(), Some("validation deadline expired"));
        Ok(())
    }

    #[tokio::test]
    async fn test_registration_expiry_wins_over_validation() -> Result<()> {
        let (db, _refs) = setup_with_reference_data().await?;
        let sink = RecordingSink::default();
        // Both deadlines in the past
        let course = create_test_course(&db, "Letters", days_from_now(1), days_from_now(2)).await?;
        let submission =
            submit_enrollment(&db, &sink, &sample_registration(course.id, "11122233344")).await?;

        let outcome = run_sweep_at(&db, days_from_now(3)).await?;
        assert_eq!(outcome.rejected, 1);
        assert_eq!(outcome.auto_approved, 0);

        let swept = Enrollment::find_by_id(submission.enrollment.id)
            .one(&db)
            .await?
            .expect("enrollment");
        assert_eq!(swept.status, EnrollmentStatus::Rejected);
        Ok(())
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() -> Result<()> {
        let (db, _refs) = setup_with_reference_data().await?;
        let sink = RecordingSink::default();
        let course =
            create_test_course(&db, "Letters", days_from_now(1), days_from_now(20)).await?;
        let submission =
            submit_enrollment(&db, &sink, &sample_registration(course.id, "11122233344")).await?;

        let first = run_sweep_at(&db, days_from_now(2)).await?;
        assert_eq!(first.total(), 1);
        let second = run_sweep_at(&db, days_from_now(2)).await?;
        assert_eq!(second.total(), 0);

        // Exactly one terminal log row despite two sweeps
        let logs = history(&db, submission.enrollment.id).await?;
        let terminal = logs
            .iter()
            .filter(|row| row.status == EnrollmentStatus::Rejected)
            .count();
        assert_eq!(terminal, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_terminal_enrollments_untouched() -> Result<()> {
        let (db, _refs) = setup_with_reference_data().await?;
        let sink = RecordingSink::default();
        let course =
            create_test_course(&db, "Letters", days_from_now(1), days_from_now(20)).await?;
        let submission =
            submit_enrollment(&db, &sink, &sample_registration(course.id, "11122233344")).await?;
        crate::core::enrollment::approve(&db, &sink, submission.enrollment.id, 7).await?;

        let outcome = run_sweep_at(&db, days_from_now(2)).await?;
        assert_eq!(outcome.total(), 0);

        let untouched = Enrollment::find_by_id(submission.enrollment.id)
            .one(&db)
            .await?
            .expect("enrollment");
        assert_eq!(untouched.status, EnrollmentStatus::Approved);
        Ok(())
    }

    #[tokio::test]
    async fn test_future_deadlines_untouched() -> Result<()> {
        let (db, _refs) = setup_with_reference_data().await?;
        let sink = RecordingSink::default();
        let course =
            create_test_course(&db, "Letters", days_from_now(10), days_from_now(20)).await?;
        submit_enrollment(&db, &sink, &sample_registration(course.id, "11122233344")).await?;

        let outcome = run_sweep_at(&db, days_from_now(5)).await?;
        assert_eq!(outcome.total(), 0);
        Ok(())
    }
}

//! Shared test utilities.
//!
//! Provides the standard in-memory database setup, seeded reference data, and
//! input factories used across the core module tests.

use crate::{
    core::candidate::{AddressInput, CandidateInput, EducationInput},
    core::enrollment::RegistrationInput,
    entities::{city, country, course, polo, state},
    errors::Result,
};
use chrono::{Duration, NaiveDate};
use sea_orm::{ActiveValue::Set, DatabaseConnection, NotSet, prelude::*};

/// City name seeded by [`seed_reference_data`].
pub const TEST_CITY_NAME: &str = "São Paulo";
/// Polo name seeded by [`seed_reference_data`].
pub const TEST_POLO_NAME: &str = "Campus Central";

/// Ids of the reference rows seeded for tests.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceIds {
    pub country_id: i64,
    pub city_id: i64,
    pub polo_id: i64,
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Seeds the minimal reference catalog: one country ("BR"), one state, one
/// city and one polo, and returns their ids.
pub async fn seed_reference_data(db: &DatabaseConnection) -> Result<ReferenceIds> {
    let brazil = country::ActiveModel {
        id: NotSet,
        name: Set("Brasil".to_string()),
        code: Set("BR".to_string()),
    }
    .insert(db)
    .await?;
    let sao_paulo_state = state::ActiveModel {
        id: NotSet,
        name: Set("São Paulo".to_string()),
        uf: Set("SP".to_string()),
        country_id: Set(brazil.id),
    }
    .insert(db)
    .await?;
    let sao_paulo = city::ActiveModel {
        id: NotSet,
        name: Set(TEST_CITY_NAME.to_string()),
        state_id: Set(sao_paulo_state.id),
    }
    .insert(db)
    .await?;
    let campus = polo::ActiveModel {
        id: NotSet,
        name: Set(TEST_POLO_NAME.to_string()),
        street: Set("Avenida Paulista".to_string()),
        number: Set(1000),
        district: Set("Bela Vista".to_string()),
        city_id: Set(Some(sao_paulo.id)),
    }
    .insert(db)
    .await?;

    Ok(ReferenceIds {
        country_id: brazil.id,
        city_id: sao_paulo.id,
        polo_id: campus.id,
    })
}

/// Standard test setup: in-memory database plus seeded reference data.
pub async fn setup_with_reference_data() -> Result<(DatabaseConnection, ReferenceIds)> {
    let db = setup_test_db().await?;
    let refs = seed_reference_data(&db).await?;
    Ok((db, refs))
}

/// An instant `days` days from now, in the civil zone. Negative values give
/// past instants.
#[must_use]
pub fn days_from_now(days: i64) -> DateTimeWithTimeZone {
    crate::core::clock::civil_now() + Duration::days(days)
}

/// Creates a test course with the given deadlines. No sites are attached;
/// tests needing the polo picker attach their own through `core::course`.
pub async fn create_test_course(
    db: &DatabaseConnection,
    name: &str,
    registration_deadline: DateTimeWithTimeZone,
    validation_deadline: DateTimeWithTimeZone,
) -> Result<course::Model> {
    course::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        description: Set(None),
        registration_deadline: Set(registration_deadline),
        validation_deadline: Set(validation_deadline),
        workload_hours: Set(1600.0),
        prerequisites: Set(None),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates an extra polo for tests that need more than the seeded one.
pub async fn create_test_polo(db: &DatabaseConnection, name: &str) -> Result<polo::Model> {
    polo::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        street: Set("Rua Quinze".to_string()),
        number: Set(42),
        district: Set("Centro".to_string()),
        city_id: Set(None),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// A complete candidate payload resolving against the seeded reference data.
#[must_use]
pub fn sample_candidate_input(national_id: &str) -> CandidateInput {
    CandidateInput {
        email: "maria@example.org".to_string(),
        full_name: "Maria da Silva".to_string(),
        social_name: None,
        mother_name: "Ana da Silva".to_string(),
        national_id: national_id.to_string(),
        general_registry: "12.345.678-9".to_string(),
        tax_document: None,
        identity_document: None,
        nationality: "BR".to_string(),
        birthplace: TEST_CITY_NAME.to_string(),
        polo: TEST_POLO_NAME.to_string(),
        birth_date: NaiveDate::from_ymd_opt(1995, 3, 14).expect("valid date"),
        phone: "+55 11 91234-5678".to_string(),
        gender: 1,
        marital_status: 0,
        income_bracket: 2,
        ethnicity: 3,
        submitted_at: Some("01/02/2026 10:00".to_string()),
        address: AddressInput {
            area: 0,
            postal_code: "01310-100".to_string(),
            state: "SP".to_string(),
            city: TEST_CITY_NAME.to_string(),
            district: "Bela Vista".to_string(),
            street: "Avenida Paulista".to_string(),
            number: "1000".to_string(),
            complement: None,
        },
        education: EducationInput {
            school_type: 1,
            education_level: 3,
            transcript_document: None,
        },
    }
}

/// A full registration for the given course and national id.
#[must_use]
pub fn sample_registration(course_id: i64, national_id: &str) -> RegistrationInput {
    RegistrationInput {
        course_id,
        candidate: sample_candidate_input(national_id),
    }
}

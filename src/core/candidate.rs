//! Candidate records: the identity payload of a registration and the
//! self-service correction flow.
//!
//! A candidate row is created per enrollment attempt inside the submission
//! transaction (see `core::enrollment`). Unknown input keys are dropped by
//! deserialization; reference fields arrive as human-readable values and are
//! resolved to ids before anything is written.

use crate::{
    core::reference,
    entities::{
        Address, EducationHistory, address, candidate, education_history,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, NotSet, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::debug;

/// Address block of a registration, as submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressInput {
    /// Urban/rural area (enumerated code)
    pub area: i32,
    pub postal_code: String,
    /// Free-text state name, stored as typed
    pub state: String,
    /// City name; stored as typed and also resolved to a normalized reference
    pub city: String,
    pub district: String,
    pub street: String,
    pub number: String,
    #[serde(default)]
    pub complement: Option<String>,
}

/// Education block of a registration, as submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct EducationInput {
    /// Public/private school (enumerated code)
    pub school_type: i32,
    /// Education level attained (enumerated code)
    pub education_level: i32,
    /// Opaque blob name of an already-stored transcript image
    #[serde(default)]
    pub transcript_document: Option<String>,
}

/// Identity payload of a registration. Reference fields (`nationality`,
/// `birthplace`, `polo`) carry human-readable values resolved at submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateInput {
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub social_name: Option<String>,
    pub mother_name: String,
    /// Government identity number (CPF)
    pub national_id: String,
    /// General registry number (RG)
    pub general_registry: String,
    #[serde(default)]
    pub tax_document: Option<String>,
    #[serde(default)]
    pub identity_document: Option<String>,
    /// Two-letter country code
    pub nationality: String,
    /// Birthplace city name
    pub birthplace: String,
    /// Offering site name
    pub polo: String,
    pub birth_date: NaiveDate,
    pub phone: String,
    pub gender: i32,
    pub marital_status: i32,
    pub income_bracket: i32,
    pub ethnicity: i32,
    /// Free-text submission timestamp from the form, folded into the access
    /// hash as extra entropy. Never parsed.
    #[serde(default)]
    pub submitted_at: Option<String>,
    pub address: AddressInput,
    pub education: EducationInput,
}

/// Reference ids resolved from the human-readable fields of a
/// [`CandidateInput`], all looked up before any row is written.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedReferences {
    pub nationality_id: i64,
    pub birthplace_id: i64,
    pub polo_id: i64,
    pub address_city_id: i64,
}

/// Resolves every reference field of a registration, failing on the first
/// miss with an error naming the offending field.
pub async fn resolve_references<C>(db: &C, input: &CandidateInput) -> Result<ResolvedReferences>
where
    C: ConnectionTrait,
{
    let nationality = reference::lookup_country_by_code(db, &input.nationality).await?;
    let birthplace = reference::lookup_city_by_name(db, &input.birthplace, "birthplace").await?;
    let polo = reference::lookup_polo_by_name(db, &input.polo).await?;
    let address_city = reference::lookup_city_by_name(db, &input.address.city, "city").await?;
    Ok(ResolvedReferences {
        nationality_id: nationality.id,
        birthplace_id: birthplace.id,
        polo_id: polo.id,
        address_city_id: address_city.id,
    })
}

/// Inserts the candidate row plus its address and education records. Runs on
/// the caller's transaction; the enrollment row is inserted by the caller on
/// the same transaction.
pub async fn create_candidate<C>(
    db: &C,
    input: &CandidateInput,
    refs: &ResolvedReferences,
) -> Result<candidate::Model>
where
    C: ConnectionTrait,
{
    let row = candidate::ActiveModel {
        id: NotSet,
        email: Set(input.email.clone()),
        full_name: Set(input.full_name.clone()),
        social_name: Set(input.social_name.clone()),
        mother_name: Set(input.mother_name.clone()),
        national_id: Set(input.national_id.clone()),
        general_registry: Set(input.general_registry.clone()),
        tax_document: Set(input.tax_document.clone()),
        identity_document: Set(input.identity_document.clone()),
        tax_document_status: Set(0),
        identity_document_status: Set(0),
        nationality_id: Set(refs.nationality_id),
        birthplace_id: Set(refs.birthplace_id),
        birth_date: Set(input.birth_date),
        phone: Set(input.phone.clone()),
        polo_id: Set(refs.polo_id),
        gender: Set(input.gender),
        marital_status: Set(input.marital_status),
        income_bracket: Set(input.income_bracket),
        ethnicity: Set(input.ethnicity),
    }
    .insert(db)
    .await?;

    address::ActiveModel {
        id: NotSet,
        candidate_id: Set(row.id),
        area: Set(input.address.area),
        postal_code: Set(input.address.postal_code.clone()),
        state: Set(input.address.state.clone()),
        city: Set(input.address.city.clone()),
        city_id: Set(Some(refs.address_city_id)),
        district: Set(input.address.district.clone()),
        street: Set(input.address.street.clone()),
        number: Set(input.address.number.clone()),
        complement: Set(input.address.complement.clone()),
    }
    .insert(db)
    .await?;

    education_history::ActiveModel {
        id: NotSet,
        candidate_id: Set(row.id),
        school_type: Set(input.education.school_type),
        education_level: Set(input.education.education_level),
        transcript_document: Set(input.education.transcript_document.clone()),
    }
    .insert(db)
    .await?;

    debug!(candidate_id = row.id, "candidate record created");
    Ok(row)
}

/// Partial update of the address block. Fields left `None` keep their
/// current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressUpdate {
    #[serde(default)]
    pub area: Option<i32>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// City name; re-resolved against the catalog when present
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub complement: Option<String>,
}

/// Partial update of the education block. Created if the candidate has no
/// education record yet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EducationUpdate {
    #[serde(default)]
    pub school_type: Option<i32>,
    #[serde(default)]
    pub education_level: Option<i32>,
    #[serde(default)]
    pub transcript_document: Option<String>,
}

/// Partial update of a candidate record. Every field is optional; absent
/// fields are untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub social_name: Option<String>,
    #[serde(default)]
    pub mother_name: Option<String>,
    #[serde(default)]
    pub general_registry: Option<String>,
    #[serde(default)]
    pub tax_document: Option<String>,
    #[serde(default)]
    pub identity_document: Option<String>,
    /// Two-letter country code, re-resolved when present
    #[serde(default)]
    pub nationality: Option<String>,
    /// Birthplace city name, re-resolved when present
    #[serde(default)]
    pub birthplace: Option<String>,
    /// Offering site name, re-resolved when present
    #[serde(default)]
    pub polo: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Option<i32>,
    #[serde(default)]
    pub marital_status: Option<i32>,
    #[serde(default)]
    pub income_bracket: Option<i32>,
    #[serde(default)]
    pub ethnicity: Option<i32>,
    #[serde(default)]
    pub address: Option<AddressUpdate>,
    #[serde(default)]
    pub education: Option<EducationUpdate>,
}

/// Applies a partial update to a candidate and its dependent records, all in
/// one transaction.
///
/// The address is updated in place when one exists and silently skipped when
/// none does; the education record is created if absent. The national id is
/// immutable once submitted.
pub async fn update_candidate(
    db: &DatabaseConnection,
    candidate_id: i64,
    update: &CandidateUpdate,
) -> Result<candidate::Model> {
    let txn = db.begin().await?;
    let updated = apply_update(&txn, candidate_id, update).await?;
    txn.commit().await?;
    Ok(updated)
}

/// Transaction body of [`update_candidate`], also reused by the enrollment
/// correction flow which wraps it in a larger transaction.
pub(crate) async fn apply_update<C>(
    db: &C,
    candidate_id: i64,
    update: &CandidateUpdate,
) -> Result<candidate::Model>
where
    C: ConnectionTrait,
{
    let existing = crate::entities::Candidate::find_by_id(candidate_id)
        .one(db)
        .await?
        .ok_or(Error::CandidateNotFound { id: candidate_id })?;

    let mut row: candidate::ActiveModel = existing.into();
    if let Some(email) = &update.email {
        row.email = Set(email.clone());
    }
    if let Some(full_name) = &update.full_name {
        row.full_name = Set(full_name.clone());
    }
    if let Some(social_name) = &update.social_name {
        row.social_name = Set(Some(social_name.clone()));
    }
    if let Some(mother_name) = &update.mother_name {
        row.mother_name = Set(mother_name.clone());
    }
    if let Some(general_registry) = &update.general_registry {
        row.general_registry = Set(general_registry.clone());
    }
    if let Some(tax_document) = &update.tax_document {
        row.tax_document = Set(Some(tax_document.clone()));
    }
    if let Some(identity_document) = &update.identity_document {
        row.identity_document = Set(Some(identity_document.clone()));
    }
    if let Some(code) = &update.nationality {
        let country = reference::lookup_country_by_code(db, code).await?;
        row.nationality_id = Set(country.id);
    }
    if let Some(name) = &update.birthplace {
        let city = reference::lookup_city_by_name(db, name, "birthplace").await?;
        row.birthplace_id = Set(city.id);
    }
    if let Some(name) = &update.polo {
        let polo = reference::lookup_polo_by_name(db, name).await?;
        row.polo_id = Set(polo.id);
    }
    if let Some(birth_date) = update.birth_date {
        row.birth_date = Set(birth_date);
    }
    if let Some(phone) = &update.phone {
        row.phone = Set(phone.clone());
    }
    if let Some(gender) = update.gender {
        row.gender = Set(gender);
    }
    if let Some(marital_status) = update.marital_status {
        row.marital_status = Set(marital_status);
    }
    if let Some(income_bracket) = update.income_bracket {
        row.income_bracket = Set(income_bracket);
    }
    if let Some(ethnicity) = update.ethnicity {
        row.ethnicity = Set(ethnicity);
    }
    let updated = row.update(db).await?;

    if let Some(address_update) = &update.address {
        apply_address_update(db, candidate_id, address_update).await?;
    }
    if let Some(education_update) = &update.education {
        apply_education_update(db, candidate_id, education_update).await?;
    }

    Ok(updated)
}

async fn apply_address_update<C>(
    db: &C,
    candidate_id: i64,
    update: &AddressUpdate,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let Some(existing) = Address::find()
        .filter(address::Column::CandidateId.eq(candidate_id))
        .one(db)
        .await?
    else {
        // No address on file; nothing to update
        debug!(candidate_id, "address update skipped, no address on file");
        return Ok(());
    };

    let mut row: address::ActiveModel = existing.into();
    if let Some(area) = update.area {
        row.area = Set(area);
    }
    if let Some(postal_code) = &update.postal_code {
        row.postal_code = Set(postal_code.clone());
    }
    if let Some(state) = &update.state {
        row.state = Set(state.clone());
    }
    if let Some(city) = &update.city {
        let resolved = reference::lookup_city_by_name(db, city, "city").await?;
        row.city = Set(city.clone());
        row.city_id = Set(Some(resolved.id));
    }
    if let Some(district) = &update.district {
        row.district = Set(district.clone());
    }
    if let Some(street) = &update.street {
        row.street = Set(street.clone());
    }
    if let Some(number) = &update.number {
        row.number = Set(number.clone());
    }
    if let Some(complement) = &update.complement {
        row.complement = Set(Some(complement.clone()));
    }
    row.update(db).await?;
    Ok(())
}

async fn apply_education_update<C>(
    db: &C,
    candidate_id: i64,
    update: &EducationUpdate,
) -> Result<()>
where
    C: ConnectionTrait,
{
    match EducationHistory::find()
        .filter(education_history::Column::CandidateId.eq(candidate_id))
        .one(db)
        .await?
    {
        Some(existing) => {
            let mut row: education_history::ActiveModel = existing.into();
            if let Some(school_type) = update.school_type {
                row.school_type = Set(school_type);
            }
            if let Some(education_level) = update.education_level {
                row.education_level = Set(education_level);
            }
            if let Some(transcript_document) = &update.transcript_document {
                row.transcript_document = Set(Some(transcript_document.clone()));
            }
            row.update(db).await?;
        }
        None => {
            education_history::ActiveModel {
                id: NotSet,
                candidate_id: Set(candidate_id),
                school_type: Set(update.school_type.unwrap_or_default()),
                education_level: Set(update.education_level.unwrap_or_default()),
                transcript_document: Set(update.transcript_document.clone()),
            }
            .insert(db)
            .await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use sea_orm::TransactionTrait;

    #[tokio::test]
    async fn test_resolve_references_maps_all_fields() -> Result<()> {
        let (db, refs) = setup_with_reference_data().await?;
        let input = sample_candidate_input("11122233344");

        let resolved = resolve_references(&db, &input).await?;
        assert_eq!(resolved.nationality_id, refs.country_id);
        assert_eq!(resolved.birthplace_id, refs.city_id);
        assert_eq!(resolved.polo_id, refs.polo_id);
        assert_eq!(resolved.address_city_id, refs.city_id);
        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_references_unknown_polo() -> Result<()> {
        let (db, _refs) = setup_with_reference_data().await?;
        let mut input = sample_candidate_input("11122233344");
        input.polo = "Campus Inexistente".to_string();

        let err = resolve_references(&db, &input).await.unwrap_err();
        assert!(matches!(err, Error::ReferenceNotFound { field: "polo", .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_candidate_writes_dependent_records() -> Result<()> {
        let (db, _refs) = setup_with_reference_data().await?;
        let input = sample_candidate_input("11122233344");
        let resolved = resolve_references(&db, &input).await?;

        let txn = db.begin().await?;
        let row = create_candidate(&txn, &input, &resolved).await?;
        txn.commit().await?;

        let address = Address::find()
            .filter(address::Column::CandidateId.eq(row.id))
            .one(&db)
            .await?
            .expect("address row");
        assert_eq!(address.city, TEST_CITY_NAME);
        assert_eq!(address.city_id, Some(resolved.address_city_id));

        let education = EducationHistory::find()
            .filter(education_history::Column::CandidateId.eq(row.id))
            .one(&db)
            .await?
            .expect("education row");
        assert_eq!(education.school_type, input.education.school_type);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_candidate_partial_fields() -> Result<()> {
        let (db, _refs) = setup_with_reference_data().await?;
        let input = sample_candidate_input("11122233344");
        let resolved = resolve_references(&db, &input).await?;
        let txn = db.begin().await?;
        let row = create_candidate(&txn, &input, &resolved).await?;
        txn.commit().await?;

        let update = CandidateUpdate {
            phone: Some("+55 11 99999-0000".to_string()),
            address: Some(AddressUpdate {
                street: Some("Rua Nova".to_string()),
                ..AddressUpdate::default()
            }),
            ..CandidateUpdate::default()
        };
        let updated = update_candidate(&db, row.id, &update).await?;
        assert_eq!(updated.phone, "+55 11 99999-0000");
        // Untouched fields survive
        assert_eq!(updated.email, input.email);

        let address = Address::find()
            .filter(address::Column::CandidateId.eq(row.id))
            .one(&db)
            .await?
            .expect("address row");
        assert_eq!(address.street, "Rua Nova");
        assert_eq!(address.postal_code, input.address.postal_code);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_candidate() -> Result<()> {
        let (db, _refs) = setup_with_reference_data().await?;
        let err = update_candidate(&db, 404, &CandidateUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CandidateNotFound { id: 404 }));
        Ok(())
    }

    #[tokio::test]
    async fn test_education_created_if_absent() -> Result<()> {
        let (db, _refs) = setup_with_reference_data().await?;
        let input = sample_candidate_input("11122233344");
        let resolved = resolve_references(&db, &input).await?;
        let txn = db.begin().await?;
        let row = create_candidate(&txn, &input, &resolved).await?;
        txn.commit().await?;

        // Remove the record created at registration, then update
        EducationHistory::delete_many()
            .filter(education_history::Column::CandidateId.eq(row.id))
            .exec(&db)
            .await?;

        let update = CandidateUpdate {
            education: Some(EducationUpdate {
                education_level: Some(4),
                ..EducationUpdate::default()
            }),
            ..CandidateUpdate::default()
        };
        update_candidate(&db, row.id, &update).await?;

        let education = EducationHistory::find()
            .filter(education_history::Column::CandidateId.eq(row.id))
            .one(&db)
            .await?
            .expect("education row recreated");
        assert_eq!(education.education_level, 4);
        Ok(())
    }
}

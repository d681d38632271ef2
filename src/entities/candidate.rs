//! Candidate entity - one person's submitted identity record for one
//! enrollment attempt.
//!
//! `national_id` is deliberately NOT unique: a person submitting for several
//! courses gets one candidate row per enrollment, all sharing the national id.
//! The duplicate and quota invariants in admission control are keyed on the
//! national id, not the candidate row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Candidate database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "candidates")]
pub struct Model {
    /// Unique identifier for the candidate row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Contact email, also the notification recipient
    pub email: String,
    /// Legal full name
    pub full_name: String,
    /// Optional social name
    pub social_name: Option<String>,
    /// Mother's full name
    pub mother_name: String,
    /// Government identity number (CPF); shared across rows by design
    pub national_id: String,
    /// General registry number (RG)
    pub general_registry: String,
    /// Opaque blob name of the attached tax-id document image
    pub tax_document: Option<String>,
    /// Opaque blob name of the attached identity document image
    pub identity_document: Option<String>,
    /// Verification status of the tax-id document (enumerated code)
    pub tax_document_status: i32,
    /// Verification status of the identity document (enumerated code)
    pub identity_document_status: i32,
    /// Nationality, resolved from a country code
    pub nationality_id: i64,
    /// Birthplace, resolved from a city name
    pub birthplace_id: i64,
    /// Date of birth
    pub birth_date: Date,
    /// Mobile phone number
    pub phone: String,
    /// Offering site the candidate registered through, resolved from a name
    pub polo_id: i64,
    /// Gender (enumerated code)
    pub gender: i32,
    /// Marital status (enumerated code)
    pub marital_status: i32,
    /// Per-capita income bracket (enumerated code)
    pub income_bracket: i32,
    /// Ethnicity (enumerated code)
    pub ethnicity: i32,
}

/// Defines relationships between Candidate and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each candidate references one country as nationality
    #[sea_orm(
        belongs_to = "super::country::Entity",
        from = "Column::NationalityId",
        to = "super::country::Column::Id"
    )]
    Nationality,
    /// Each candidate references one city as birthplace
    #[sea_orm(
        belongs_to = "super::city::Entity",
        from = "Column::BirthplaceId",
        to = "super::city::Column::Id"
    )]
    Birthplace,
    /// Each candidate registered through one polo
    #[sea_orm(
        belongs_to = "super::polo::Entity",
        from = "Column::PoloId",
        to = "super::polo::Column::Id"
    )]
    Polo,
    /// One candidate row owns one address snapshot
    #[sea_orm(has_many = "super::address::Entity")]
    Addresses,
    /// One candidate row owns one education history
    #[sea_orm(has_many = "super::education_history::Entity")]
    EducationHistories,
    /// One candidate row has enrollments (exactly one in practice)
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
}

impl Related<super::address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Addresses.def()
    }
}

impl Related<super::education_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EducationHistories.def()
    }
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod address;
pub mod candidate;
pub mod city;
pub mod country;
pub mod course;
pub mod course_polo;
pub mod education_history;
pub mod enrollment;
pub mod enrollment_log;
pub mod polo;
pub mod state;

// Re-export specific types to avoid conflicts
pub use address::{Column as AddressColumn, Entity as Address, Model as AddressModel};
pub use candidate::{Column as CandidateColumn, Entity as Candidate, Model as CandidateModel};
pub use city::{Column as CityColumn, Entity as City, Model as CityModel};
pub use country::{Column as CountryColumn, Entity as Country, Model as CountryModel};
pub use course::{Column as CourseColumn, Entity as Course, Model as CourseModel};
pub use course_polo::{Column as CoursePoloColumn, Entity as CoursePolo, Model as CoursePoloModel};
pub use education_history::{
    Column as EducationHistoryColumn, Entity as EducationHistory, Model as EducationHistoryModel,
};
pub use enrollment::{
    Column as EnrollmentColumn, Entity as Enrollment, EnrollmentStatus, Model as EnrollmentModel,
};
pub use enrollment_log::{
    Column as EnrollmentLogColumn, Entity as EnrollmentLog, Model as EnrollmentLogModel,
};
pub use polo::{Column as PoloColumn, Entity as Polo, Model as PoloModel};
pub use state::{Column as StateColumn, Entity as State, Model as StateModel};

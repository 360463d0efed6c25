pub mod clinical_records;
pub mod conflict;
pub mod scheduling;

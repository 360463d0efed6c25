use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Store-assigned identifier shared by every record type.
pub type RecordId = i64;

// ==============================================================================
// ADDRESSES
// ==============================================================================

/// Postal fields supplied when creating or editing an address owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDetails {
    pub street: String,
    pub county: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zipcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: RecordId,
    pub street: String,
    pub county: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zipcode: String,
}

impl Address {
    pub fn formatted(&self) -> String {
        format!(
            "{}, {}, {}, {}, {} - {}",
            self.street, self.county, self.city, self.state, self.country, self.zipcode
        )
    }

    pub fn details(&self) -> AddressDetails {
        AddressDetails {
            street: self.street.clone(),
            county: self.county.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            zipcode: self.zipcode.clone(),
        }
    }
}

// ==============================================================================
// DEPARTMENTS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentDetails {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: RecordId,
    pub name: String,
}

// ==============================================================================
// DOCTORS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoctorCategory {
    Medicine,
    Surgery,
    Radiologist,
}

impl DoctorCategory {
    pub const ALL: [DoctorCategory; 3] = [
        DoctorCategory::Medicine,
        DoctorCategory::Surgery,
        DoctorCategory::Radiologist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DoctorCategory::Medicine => "Medicine",
            DoctorCategory::Surgery => "Surgery",
            DoctorCategory::Radiologist => "Radiologist",
        }
    }
}

impl fmt::Display for DoctorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DoctorCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        DoctorCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| format!("unknown doctor category '{}'", value))
    }
}

/// Mutable doctor fields. Edits replace all of them, address included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub department_id: RecordId,
    pub category: DoctorCategory,
    pub experience: u32,
    pub degree: String,
    pub address: AddressDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: RecordId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub department_id: RecordId,
    pub category: DoctorCategory,
    pub experience: u32,
    pub degree: String,
    pub address: Address,
}

// ==============================================================================
// PATIENTS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub dob: NaiveDate,
    pub address: AddressDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: RecordId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub dob: NaiveDate,
    pub address: Address,
}

// ==============================================================================
// NURSES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NurseDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub doctor_id: Option<RecordId>,
    pub address: AddressDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nurse {
    pub id: RecordId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub doctor_id: Option<RecordId>,
    pub address: Address,
}

// ==============================================================================
// APPOINTMENTS AND CLINICAL RECORDS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDetails {
    pub doctor_id: RecordId,
    pub patient_id: RecordId,
    pub from_time: NaiveDateTime,
    pub to_time: NaiveDateTime,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: RecordId,
    pub doctor_id: RecordId,
    pub patient_id: RecordId,
    pub from_time: NaiveDateTime,
    pub to_time: NaiveDateTime,
    pub notes: Option<String>,
}

impl Appointment {
    pub fn details(&self) -> AppointmentDetails {
        AppointmentDetails {
            doctor_id: self.doctor_id,
            patient_id: self.patient_id,
            from_time: self.from_time,
            to_time: self.to_time,
            notes: self.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionDetails {
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: RecordId,
    pub appointment_id: RecordId,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticDetails {
    pub test_name: String,
    #[serde(default)]
    pub test_report: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub id: RecordId,
    pub appointment_id: RecordId,
    pub test_name: String,
    pub test_report: Option<String>,
}

//! Records stored in the database and the payloads that create or modify them.

pub mod checkup;
pub mod hospital;
pub mod patient;

pub use checkup::{Checkup, NewCheckup, Vitals};
pub use hospital::{Hospital, HospitalUpdate, NewHospital, PatientRef};
pub use patient::{
    DrugUsageInput, NewPatient, Patient, PatientStats, PatientSummary, PatientUpdate,
    RecentActivity,
};

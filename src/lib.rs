//! Semester GWA calculation and saved-record storage.
//!
//! [`grading::evaluate`] turns four component grades into an average, a
//! grade-point equivalent and a remark. [`records::RecordStore`] keeps named
//! results in any [`store::KeyValueStore`].

pub mod config;
pub mod grading;
pub mod models;
pub mod records;
pub mod report;
pub mod store;
pub mod theme;
pub mod transfer;
pub mod validation;

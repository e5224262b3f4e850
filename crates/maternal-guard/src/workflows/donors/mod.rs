//! Blood donor registry: append-only CSV storage and city/blood-group matching.

pub mod domain;
pub mod matcher;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    BloodGroup, DonorRecord, DonorRegistration, DonorTable, DonorValidationError, Eligibility,
    Gender, UnrecognizedValue,
};
pub use matcher::{match_donors, MatchQuery};
pub use router::donor_router;
pub use service::{DonorListing, DonorMatches, DonorRegistry, DonorServiceError};
pub use store::{CsvDonorStore, DonorStore, StorageError, DONOR_CSV_HEADER};

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use super::domain::{DonorRecord, DonorRegistration, DonorTable, DonorValidationError};
use super::matcher::{match_donors, MatchQuery};
use super::store::{DonorStore, StorageError};

/// Full donor listing; `storage_initialized` is false before the first registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonorListing {
    pub storage_initialized: bool,
    pub donors: DonorTable,
}

/// Donors matching a query. An empty `matches` is a valid outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonorMatches {
    pub storage_initialized: bool,
    pub matches: DonorTable,
}

/// Service composing donor registration, listing, and matching over a store.
pub struct DonorRegistry<S> {
    store: Arc<S>,
}

impl<S> DonorRegistry<S>
where
    S: DonorStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and append a donor. Duplicate ids are accepted.
    pub fn register(
        &self,
        registration: DonorRegistration,
    ) -> Result<DonorRecord, DonorServiceError> {
        let record = registration.into_record()?;
        self.store.append(&record).map_err(|err| {
            error!(error = %err, donor_id = record.donor_id, "failed to append donor");
            err
        })?;
        info!(
            donor_id = record.donor_id,
            blood_group = %record.blood_group,
            "donor registered"
        );
        Ok(record)
    }

    pub fn list(&self) -> Result<DonorListing, DonorServiceError> {
        let listing = match self.store.load()? {
            Some(donors) => DonorListing {
                storage_initialized: true,
                donors,
            },
            None => DonorListing {
                storage_initialized: false,
                donors: DonorTable::new(),
            },
        };
        Ok(listing)
    }

    pub fn find_matches(&self, query: &MatchQuery) -> Result<DonorMatches, DonorServiceError> {
        let stored = self.store.load()?;
        let storage_initialized = stored.is_some();
        let table = stored.unwrap_or_default();

        let matches = match_donors(&table, query.blood_group, &query.city);
        info!(
            blood_group = %query.blood_group,
            city = %query.city,
            matched = matches.len(),
            "donor match completed"
        );

        Ok(DonorMatches {
            storage_initialized,
            matches,
        })
    }
}

/// Error raised by the donor registry.
#[derive(Debug, thiserror::Error)]
pub enum DonorServiceError {
    #[error(transparent)]
    Validation(#[from] DonorValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
